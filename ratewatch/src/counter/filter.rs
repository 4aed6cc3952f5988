//! Event classification predicates.
//!
//! A counter only tallies items its filter matches; everything else is
//! silently ignored. Filters are injected at construction, so the counter
//! itself stays agnostic about what the items mean.

/// Decides whether an observed item should be counted.
///
/// Implementations must be `Send + Sync` because filters are evaluated from
/// whatever task or thread calls `observe`. Plain closures work directly via
/// the blanket implementation below.
///
/// # Example
///
/// ```
/// use ratewatch::EventFilter;
///
/// let even = |n: &u32| n % 2 == 0;
/// assert!(even.matches(&4));
/// assert!(!even.matches(&7));
/// ```
pub trait EventFilter<T>: Send + Sync {
    /// Returns true if the item should be counted.
    fn matches(&self, item: &T) -> bool;
}

/// Blanket implementation so closures can be used as filters directly.
impl<T, F> EventFilter<T> for F
where
    F: Fn(&T) -> bool + Send + Sync,
{
    fn matches(&self, item: &T) -> bool {
        self(item)
    }
}

/// Filter that matches every item.
///
/// Useful for counters that tally an already-classified stream.
#[derive(Debug, Clone, Copy, Default)]
pub struct MatchAll;

impl<T> EventFilter<T> for MatchAll {
    fn matches(&self, _item: &T) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Filter matching items that contain a marker substring.
    struct MarkerFilter {
        marker: String,
    }

    impl EventFilter<String> for MarkerFilter {
        fn matches(&self, item: &String) -> bool {
            item.to_lowercase().contains(&self.marker)
        }
    }

    #[test]
    fn test_closure_filter() {
        let filter = |n: &u32| *n > 10;
        assert!(filter.matches(&11));
        assert!(!filter.matches(&10));
    }

    #[test]
    fn test_match_all() {
        assert!(MatchAll.matches(&42u32));
        assert!(MatchAll.matches(&"anything"));
    }

    #[test]
    fn test_struct_filter() {
        let filter = MarkerFilter {
            marker: "beacon".to_string(),
        };
        assert!(filter.matches(&"Mobile BEACON unit".to_string()));
        assert!(!filter.matches(&"plain comment".to_string()));
    }

    #[test]
    fn test_filter_trait_object() {
        let filter: Box<dyn EventFilter<u32>> = Box::new(|n: &u32| n % 3 == 0);
        assert!(filter.matches(&9));
        assert!(!filter.matches(&10));
    }
}
