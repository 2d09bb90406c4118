use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Load class labels from a plain-text file, one label per line.
///
/// The line number is the class index the network's scores refer to.
pub fn load_labels(path: &Path) -> std::io::Result<Vec<String>> {
    let file = File::open(path)?;

    BufReader::new(file)
        .lines()
        .map(|line| line.map(|l| l.trim_end().to_owned()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn labels_keep_line_order() {
        let path = std::env::temp_dir().join("resnet_serve_labels_test.txt");
        let mut file = File::create(&path).unwrap();
        writeln!(file, "tench").unwrap();
        writeln!(file, "goldfish").unwrap();
        writeln!(file, "great white shark").unwrap();
        drop(file);

        let labels = load_labels(&path).unwrap();

        assert_eq!(labels, vec!["tench", "goldfish", "great white shark"]);
        std::fs::remove_file(&path).unwrap();
    }
}
