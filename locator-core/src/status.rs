/// Receiver of the two status signals shown to the user.
///
/// Both setters are called once for every resolved fix, whether or not the
/// value changed.
pub trait StatusSink {
    /// GPS fix indicator.
    fn set_gps_fix(&mut self, active: bool);

    /// Target-in-range indicator.
    fn set_target_reached(&mut self, reached: bool);
}

impl<S: StatusSink + ?Sized> StatusSink for &mut S {
    fn set_gps_fix(&mut self, active: bool) {
        (**self).set_gps_fix(active);
    }

    fn set_target_reached(&mut self, reached: bool) {
        (**self).set_target_reached(reached);
    }
}

impl<S: StatusSink + ?Sized> StatusSink for Box<S> {
    fn set_gps_fix(&mut self, active: bool) {
        (**self).set_gps_fix(active);
    }

    fn set_target_reached(&mut self, reached: bool) {
        (**self).set_target_reached(reached);
    }
}

/// The last value written to each indicator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusBits {
    pub gps_fix: bool,
    pub target_reached: bool,
}

impl StatusSink for StatusBits {
    fn set_gps_fix(&mut self, active: bool) {
        self.gps_fix = active;
    }

    fn set_target_reached(&mut self, reached: bool) {
        self.target_reached = reached;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_write_wins() {
        let mut bits = StatusBits::default();
        bits.set_gps_fix(true);
        bits.set_target_reached(true);
        bits.set_gps_fix(false);
        assert_eq!(bits, StatusBits { gps_fix: false, target_reached: true });
    }

    fn publish<S: StatusSink>(mut sink: S) {
        sink.set_gps_fix(true);
        sink.set_target_reached(true);
    }

    #[test]
    fn test_forwarding_impls() {
        let mut bits = StatusBits::default();
        publish(&mut bits);
        assert_eq!(bits, StatusBits { gps_fix: true, target_reached: true });

        let boxed: Box<dyn StatusSink> = Box::new(StatusBits::default());
        publish(boxed);
    }
}
