use tracing::debug;

/// One named extraction attempt over a context `C`.
pub struct Strategy<C: ?Sized, T> {
    pub name: &'static str,
    pub run: fn(&C) -> Option<T>,
}

impl<C: ?Sized, T> Strategy<C, T> {
    pub const fn new(name: &'static str, run: fn(&C) -> Option<T>) -> Self {
        Strategy { name, run }
    }
}

/// Runs strategies in order, first `Some` wins.
pub fn first_some<C: ?Sized, T>(ctx: &C, strategies: &[Strategy<C, T>]) -> Option<T> {
    for s in strategies {
        if let Some(v) = (s.run)(ctx) {
            debug!(strategy = s.name, "strategy matched");
            return Some(v);
        }
        debug!(strategy = s.name, "strategy empty");
    }
    None
}

/// Like [`first_some`], treating an empty vector as a miss.
pub fn first_non_empty<C: ?Sized, T>(ctx: &C, strategies: &[Strategy<C, Vec<T>>]) -> Vec<T> {
    for s in strategies {
        match (s.run)(ctx) {
            Some(v) if !v.is_empty() => {
                debug!(strategy = s.name, count = v.len(), "strategy matched");
                return v;
            }
            _ => debug!(strategy = s.name, "strategy empty"),
        }
    }
    Vec::new()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn none(_: &str) -> Option<u32> { None }
    fn len(s: &str) -> Option<u32> { Some(s.len() as u32) }
    fn never(_: &str) -> Option<u32> { panic!("should not run after a hit") }

    fn empty_vec(_: &str) -> Option<Vec<u8>> { Some(Vec::new()) }
    fn bytes(s: &str) -> Option<Vec<u8>> { Some(s.as_bytes().to_vec()) }

    #[test]
    fn stops_at_first_hit() {
        let strategies = [
            Strategy::new("none", none as fn(&str) -> Option<u32>),
            Strategy::new("len", len),
            Strategy::new("never", never),
        ];
        assert_eq!(first_some("abc", &strategies), Some(3));
    }

    #[test]
    fn empty_vectors_fall_through() {
        let strategies = [Strategy::new("empty", empty_vec as fn(&str) -> Option<Vec<u8>>), Strategy::new("bytes", bytes)];
        assert_eq!(first_non_empty("hi", &strategies), b"hi".to_vec());
        let only_empty = [Strategy::new("empty", empty_vec as fn(&str) -> Option<Vec<u8>>)];
        assert!(first_non_empty("hi", &only_empty).is_empty());
    }
}
