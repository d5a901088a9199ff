//! Indicator trait definitions.

/// Streaming indicator that maintains internal state.
///
/// Streaming indicators are fed one input at a time. They are meant to be
/// created, folded over one sequence, and dropped; nothing should keep one
/// alive between unrelated sequences.
pub trait StreamingIndicator {
    /// The value fed on each step (a price, or a whole bar).
    type Input;
    /// The output type of the indicator.
    type Output;

    /// Update the indicator with a new value.
    ///
    /// # Returns
    /// The current indicator value, or None while still warming up
    fn update(&mut self, input: Self::Input) -> Option<Self::Output>;

    /// Check if the indicator has enough data to produce values.
    fn is_ready(&self) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Running sum over the last `period` values.
    struct WindowSum {
        period: usize,
        values: Vec<f64>,
    }

    impl StreamingIndicator for WindowSum {
        type Input = f64;
        type Output = f64;

        fn update(&mut self, input: f64) -> Option<f64> {
            self.values.push(input);
            if self.values.len() > self.period {
                self.values.remove(0);
            }
            self.is_ready().then(|| self.values.iter().sum())
        }

        fn is_ready(&self) -> bool {
            self.values.len() >= self.period
        }
    }

    #[test]
    fn test_streaming_warmup() {
        let mut indicator = WindowSum { period: 3, values: vec![] };

        assert_eq!(indicator.update(1.0), None);
        assert_eq!(indicator.update(2.0), None);
        assert_eq!(indicator.update(3.0), Some(6.0));
        assert_eq!(indicator.update(4.0), Some(9.0));
        assert!(indicator.is_ready());
    }
}
