use bitflags::bitflags;

bitflags! {
    /// One frame's worth of player input, sampled before motion runs.
    ///
    /// Movement bits are level-triggered (held keys); the toggle bits are
    /// set only on the frame the key went down.
    #[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
    pub struct InputCmd: u16 {
        const MOVE_FORWARD    = 0x0001;
        const MOVE_BACK       = 0x0002;
        const STRAFE_LEFT     = 0x0004;
        const STRAFE_RIGHT    = 0x0008;
        const TURN_LEFT       = 0x0010;
        const TURN_RIGHT      = 0x0020;

        // Edge-triggered
        const TOGGLE_MINIMAP  = 0x0100;
        const TOGGLE_TEXTURED = 0x0200;
        const QUIT            = 0x0400;
    }
}

impl InputCmd {
    /// −1, 0 or +1 from a pair of opposing bits.
    #[inline]
    pub fn axis(self, positive: Self, negative: Self) -> f64 {
        f64::from(i8::from(self.contains(positive)) - i8::from(self.contains(negative)))
    }

    /// Forward (+) / back (−).
    #[inline]
    pub fn forward(self) -> f64 {
        self.axis(Self::MOVE_FORWARD, Self::MOVE_BACK)
    }

    /// Right (+) / left (−).
    #[inline]
    pub fn strafe(self) -> f64 {
        self.axis(Self::STRAFE_RIGHT, Self::STRAFE_LEFT)
    }

    /// Right (+) / left (−).
    #[inline]
    pub fn turn(self) -> f64 {
        self.axis(Self::TURN_RIGHT, Self::TURN_LEFT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opposing_keys_cancel() {
        let cmd = InputCmd::MOVE_FORWARD | InputCmd::MOVE_BACK | InputCmd::TURN_LEFT;
        assert_eq!(cmd.forward(), 0.0);
        assert_eq!(cmd.turn(), -1.0);
        assert_eq!(cmd.strafe(), 0.0);
        assert_eq!(InputCmd::STRAFE_RIGHT.strafe(), 1.0);
    }
}
