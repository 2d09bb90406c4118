use chrono::{DateTime, Utc};
use log::{debug, info};

/// Wall-clock timer for pipeline stages, reported through the log.
pub struct Timer {
    name: String,
    tstamp: Option<DateTime<Utc>>,
}

impl Timer {
    /// Create a new timer
    pub fn new(name: &str) -> Self {
        Timer {
            name: name.to_owned(),
            tstamp: None,
        }
    }

    pub fn new_start(name: &str) -> Self {
        let mut t = Timer::new(name);
        t.start();
        t
    }

    /// Start the timer
    pub fn start(&mut self) {
        info!("{}: starting", self.name);

        self.tstamp = Some(Utc::now());
    }

    /// Stop the timer and log the elapsed time
    pub fn stop(&mut self) {
        match self.tstamp.take() {
            None => debug!("{}: not running!", self.name),
            Some(tstamp) => {
                let d = Utc::now() - tstamp;
                info!("{} duration: {} msec", self.name, d.num_milliseconds());
            }
        }
    }
}
