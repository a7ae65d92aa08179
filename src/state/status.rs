/// One-line status shown at the bottom of the canvas while fresh.
const FRESH_MS: f64 = 5000.0;

#[derive(Clone, Debug, Default)]
pub struct StatusLine {
    msg: String,
    at_ms: f64,
}

impl StatusLine {
    pub fn set(&mut self, msg: impl Into<String>, now_ms: f64) {
        self.msg = msg.into();
        self.at_ms = now_ms;
    }

    pub fn fresh(&self, now_ms: f64) -> Option<&str> {
        if !self.msg.is_empty() && now_ms - self.at_ms <= FRESH_MS {
            Some(&self.msg)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_fades_after_five_seconds() {
        let mut s = StatusLine::default();
        assert_eq!(s.fresh(0.0), None);
        s.set("State loaded.", 1000.0);
        assert_eq!(s.fresh(1000.0), Some("State loaded."));
        assert_eq!(s.fresh(6000.0), Some("State loaded."));
        assert_eq!(s.fresh(6001.0), None);
    }
}
