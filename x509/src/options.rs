/// Upper bound on the DER size of a certificate, 64 KiB.
pub const DEFAULT_MAX_INPUT_SIZE: usize = 64 * 1024;

/// Knobs for [`parse_certificate_with`](crate::parse_certificate_with).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOptions {
    max_input_size: usize,
}

impl DecodeOptions {
    pub fn new() -> Self {
        DecodeOptions {
            max_input_size: DEFAULT_MAX_INPUT_SIZE,
        }
    }

    /// Sets the largest DER input accepted. PEM text may be twice as long to
    /// leave room for base64 expansion and armor.
    pub fn with_max_input_size(mut self, max_input_size: usize) -> Self {
        self.max_input_size = max_input_size;
        self
    }

    pub fn max_input_size(&self) -> usize {
        self.max_input_size
    }

    pub(crate) fn max_text_size(&self) -> usize {
        self.max_input_size.saturating_mul(2)
    }
}

impl Default for DecodeOptions {
    fn default() -> Self {
        DecodeOptions::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_limit() {
        let options = DecodeOptions::default();
        assert_eq!(65536, options.max_input_size());
        assert_eq!(131072, options.max_text_size());
    }

    #[test]
    fn test_with_max_input_size() {
        let options = DecodeOptions::new().with_max_input_size(usize::MAX);
        assert_eq!(usize::MAX, options.max_input_size());
        assert_eq!(usize::MAX, options.max_text_size());
    }
}
