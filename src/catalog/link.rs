//! Deep links (`?eventid=..&story=..`)

use url::form_urlencoded;

use super::{Memory, StoryEvent};

/// Catalog selection carried in a URL query string
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeepLink {
    pub event_id: Option<String>,
    pub story_id: Option<String>,
}

/// What a deep link points at
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LinkTarget<'a> {
    /// No selection; show the event index
    Index,
    Event(&'a StoryEvent),
    Memory(&'a StoryEvent, &'a Memory),
}

impl DeepLink {
    /// Parse a query string; unknown keys and empty values are ignored
    pub fn parse(query: &str) -> Self {
        let query = query.trim();
        let query = query
            .split_once('?')
            .map_or(query, |(_, rest)| rest);
        let query = query.split('#').next().unwrap_or_default();

        let mut link = Self::default();
        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            let value = value.trim();
            if value.is_empty() {
                continue;
            }
            match key.as_ref() {
                "eventid" => link.event_id = Some(value.to_string()),
                "story" => link.story_id = Some(value.to_string()),
                _ => {}
            }
        }
        link
    }

    pub fn is_empty(&self) -> bool {
        self.event_id.is_none() && self.story_id.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_both_ids() {
        let link = DeepLink::parse("?eventid=10&story=1042");
        assert_eq!(link.event_id.as_deref(), Some("10"));
        assert_eq!(link.story_id.as_deref(), Some("1042"));
    }

    #[test]
    fn accepts_full_urls_and_fragments() {
        let link = DeepLink::parse("https://wiki.test/story.html?story=7&eventid=3#top");
        assert_eq!(link.event_id.as_deref(), Some("3"));
        assert_eq!(link.story_id.as_deref(), Some("7"));
    }

    #[test]
    fn empty_and_unknown_parameters_are_ignored() {
        let link = DeepLink::parse("eventid=&lang=en&story");
        assert!(link.is_empty());
    }

    #[test]
    fn values_are_percent_decoded() {
        let link = DeepLink::parse("eventid=world%20main&story=a+b");
        assert_eq!(link.event_id.as_deref(), Some("world main"));
        assert_eq!(link.story_id.as_deref(), Some("a b"));
    }

    #[test]
    fn malformed_escapes_are_kept_verbatim() {
        let link = DeepLink::parse("eventid=100%&story=%zz");
        assert_eq!(link.event_id.as_deref(), Some("100%"));
        assert_eq!(link.story_id.as_deref(), Some("%zz"));
    }
}
