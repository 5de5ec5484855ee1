//! Dialogue markup
//!
//! Script text carries rich-text tags (`<color=#ffde38>`, `<size=40>`) and
//! placeholders (`{namecode:101}`, `{playername}`).

use crate::types::Roster;

const TAGS: &[&str] = &["color", "size", "b", "i", "material", "quad"];

/// Strip known rich-text tags, keeping their inner text
///
/// Unknown angle-bracket runs are left as written.
pub fn plain_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(open) = rest.find('<') {
        out.push_str(&rest[..open]);
        let after = &rest[open..];
        match after.find('>') {
            Some(close) if is_known_tag(&after[1..close]) => {
                rest = &after[close + 1..];
            }
            _ => {
                out.push('<');
                rest = &after[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn is_known_tag(inner: &str) -> bool {
    let name = inner.trim_start_matches('/');
    let name = name.split(['=', ' ']).next().unwrap_or_default();
    TAGS.iter().any(|tag| tag.eq_ignore_ascii_case(name))
}

/// Replace `{playername}` and `{namecode:N}` placeholders
///
/// Name codes missing from the roster are left untouched.
pub fn substitute(text: &str, roster: &Roster, commander: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open..];
        let Some(close) = after.find('}') else {
            out.push_str(after);
            return out;
        };

        let token = &after[1..close];
        match expand(token, roster, commander) {
            Some(expanded) => out.push_str(&expanded),
            None => out.push_str(&after[..=close]),
        }
        rest = &after[close + 1..];
    }
    out.push_str(rest);
    out
}

fn expand(token: &str, roster: &Roster, commander: &str) -> Option<String> {
    if token == "playername" {
        return Some(commander.to_string());
    }
    let id = token.strip_prefix("namecode:")?.trim().parse::<u32>().ok()?;
    roster.get(id).map(|c| c.name.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Character;

    #[test]
    fn strips_color_and_size_tags() {
        assert_eq!(
            plain_text("<color=#ffde38>Warning</color>, <size=40>BIG</size>!"),
            "Warning, BIG!"
        );
    }

    #[test]
    fn keeps_unknown_brackets() {
        assert_eq!(plain_text("a < b and <3"), "a < b and <3");
        assert_eq!(plain_text("<unknown>x"), "<unknown>x");
    }

    #[test]
    fn substitutes_placeholders() {
        let roster = Roster::new([Character {
            id: 101,
            name: "Enterprise".to_string(),
            icon: None,
        }]);
        assert_eq!(
            substitute("{playername}, {namecode:101} is here.", &roster, "Shikikan"),
            "Shikikan, Enterprise is here."
        );
        assert_eq!(substitute("{namecode:5} {other}", &roster, "C"), "{namecode:5} {other}");
    }

    #[test]
    fn unterminated_placeholder_is_kept() {
        let roster = Roster::default();
        assert_eq!(substitute("left {open", &roster, "C"), "left {open");
    }
}
