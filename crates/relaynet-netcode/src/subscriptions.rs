//! Address-pattern subscription table

/// Handle returned by [`Subscriptions::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

/// Address pattern
///
/// - `"*"` matches every address
/// - `"/a/b/*"` matches any address strictly below `/a/b`
/// - anything else matches that exact address
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pattern {
    Any,
    Prefix(String),
    Exact(String),
}

impl Pattern {
    pub fn parse(pattern: &str) -> Self {
        if pattern == "*" {
            Pattern::Any
        } else if let Some(prefix) = pattern.strip_suffix("/*") {
            Pattern::Prefix(format!("{}/", prefix))
        } else {
            Pattern::Exact(pattern.to_string())
        }
    }

    pub fn matches(&self, address: &str) -> bool {
        match self {
            Pattern::Any => true,
            Pattern::Prefix(prefix) => address.starts_with(prefix.as_str()),
            Pattern::Exact(exact) => exact == address,
        }
    }
}

/// Routes inbound addresses to caller-defined handlers
///
/// `R` is whatever the owner dispatches on, usually a small enum.
#[derive(Debug)]
pub struct Subscriptions<R> {
    entries: Vec<(SubscriptionId, Pattern, R)>,
    next_id: u64,
}

impl<R> Subscriptions<R> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 0,
        }
    }

    /// Subscribe `route` to every address matching `pattern`
    pub fn subscribe(&mut self, pattern: &str, route: R) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, Pattern::parse(pattern), route));
        id
    }

    /// Remove a subscription; returns false if it was already gone
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(sid, _, _)| *sid != id);
        self.entries.len() != before
    }

    /// Every route subscribed to `address`, in subscription order
    pub fn resolve<'a>(&'a self, address: &'a str) -> impl Iterator<Item = &'a R> + 'a {
        self.entries
            .iter()
            .filter(move |(_, pattern, _)| pattern.matches(address))
            .map(|(_, _, route)| route)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<R> Default for Subscriptions<R> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patterns() {
        assert!(Pattern::parse("*").matches("/anything"));
        assert!(Pattern::parse("/ns/client/*").matches("/ns/client/spawn"));
        assert!(!Pattern::parse("/ns/client/*").matches("/ns/client"));
        assert!(!Pattern::parse("/ns/client/*").matches("/ns/clientele"));
        assert!(Pattern::parse("/ns/relay").matches("/ns/relay"));
        assert!(!Pattern::parse("/ns/relay").matches("/ns/relay/received"));
    }

    #[test]
    fn test_subscribe_resolve_unsubscribe() {
        let mut subs = Subscriptions::new();
        let spawn = subs.subscribe("/ns/client/spawn", "spawn");
        subs.subscribe("/ns/client/*", "client");

        let routes: Vec<_> = subs.resolve("/ns/client/spawn").copied().collect();
        assert_eq!(routes, vec!["spawn", "client"]);

        assert!(subs.unsubscribe(spawn));
        assert!(!subs.unsubscribe(spawn));

        let routes: Vec<_> = subs.resolve("/ns/client/spawn").copied().collect();
        assert_eq!(routes, vec!["client"]);
        assert_eq!(subs.len(), 1);
    }
}
