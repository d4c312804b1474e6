/// Hands out generated names scoped to one planning call.
///
/// The first name is the bare prefix (`w$`), later ones get a numeric suffix
/// (`w$1`, `w$2`, ...).
#[derive(Debug, Default)]
pub struct ColPlaceholderAllocator {
    prefix: String,
    next_index: usize,
}

impl ColPlaceholderAllocator {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next_index: 0,
        }
    }

    pub fn allocate(&mut self) -> String {
        let name = if self.next_index == 0 {
            self.prefix.clone()
        } else {
            format!("{}{}", self.prefix, self.next_index)
        };
        self.next_index += 1;
        name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocates_unique_names() {
        let mut allocator = ColPlaceholderAllocator::new("w$");
        assert_eq!(allocator.allocate(), "w$");
        assert_eq!(allocator.allocate(), "w$1");
        assert_eq!(allocator.allocate(), "w$2");
    }

    #[test]
    fn test_allocators_are_independent() {
        let mut first = ColPlaceholderAllocator::new("w$");
        let mut second = ColPlaceholderAllocator::new("w$");
        first.allocate();
        assert_eq!(second.allocate(), "w$");
    }
}
