use crate::types::err::ConfigError;

/// A configurable value together with the range of values permitted.
#[derive(Clone, Debug)]
pub struct ConfigOption<T> {
    pub name: &'static str,
    pub min: T,
    pub max: T,
    pub value: T,
}

impl<T: Clone> ConfigOption<T> {
    pub fn min_max(&self) -> (T, T) {
        (self.min.clone(), self.max.clone())
    }
}

impl<T: Clone + PartialOrd> ConfigOption<T> {
    /// Sets the value of the option, if the value is within range.
    pub fn set(&mut self, value: T) -> Result<(), ConfigError> {
        if self.min <= value && value <= self.max {
            self.value = value;
            Ok(())
        } else {
            Err(ConfigError::OutOfRange(self.name))
        }
    }

    /// Whether the value of the option is within range.
    pub fn in_range(&self) -> bool {
        self.min <= self.value && self.value <= self.max
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_checked() {
        let mut option = ConfigOption {
            name: "tol",
            min: 0.0,
            max: 1.0,
            value: 0.5,
        };
        assert!(option.set(0.25).is_ok());
        assert_eq!(option.set(2.0), Err(ConfigError::OutOfRange("tol")));
        assert_eq!(option.value, 0.25);
        assert_eq!(option.min_max(), (0.0, 1.0));
    }
}
