use super::parse_utils::{header, header_id, next_line};
use super::{Attribution, Kind};

pub(crate) fn tag_is_valid(content: &[u8]) -> bool {
    let (line, rest) = match next_line(content) {
        Some(x) => x,
        None => return false,
    };
    if header_id(line, b"object").is_none() {
        return false;
    }

    let (line, rest) = match next_line(rest) {
        Some(x) => x,
        None => return false,
    };
    match header(line, b"type").and_then(|t| std::str::from_utf8(t).ok()) {
        Some(t) if t.parse::<Kind>().is_ok() => (),
        _ => return false,
    }

    let (line, rest) = match next_line(rest) {
        Some(x) => x,
        None => return false,
    };
    match header(line, b"tag") {
        Some(name) if !name.is_empty() => (),
        _ => return false,
    }

    // The tagger line does not need to be present.
    match next_line(rest).and_then(|(line, _)| header(line, b"tagger")) {
        Some(tagger) => Attribution::parse(tagger).is_some(),
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid() {
        let cs = b"object be9bfa841874ccc9f2ef7c48d0c76226f89b7189\n\
                   type commit\n\
                   tag test-tag\n\
                   tagger A. U. Thor <tagger@localhost> 1 +0000\n";
        assert!(tag_is_valid(cs));

        let cs = b"object be9bfa841874ccc9f2ef7c48d0c76226f89b7189\n\
                   type commit\n\
                   tag test-tag\n";
        assert!(tag_is_valid(cs));
    }

    #[test]
    fn invalid_object() {
        assert!(!tag_is_valid(b""));
        assert!(!tag_is_valid(
            b"object\tbe9bfa841874ccc9f2ef7c48d0c76226f89b7189\n"
        ));
        assert!(!tag_is_valid(b"object be9\n"));
    }

    #[test]
    fn invalid_type() {
        assert!(!tag_is_valid(
            b"object be9bfa841874ccc9f2ef7c48d0c76226f89b7189\n\
              type bogus\n\
              tag test-tag\n"
        ));
    }

    #[test]
    fn invalid_tagger() {
        assert!(!tag_is_valid(
            b"object be9bfa841874ccc9f2ef7c48d0c76226f89b7189\n\
              type commit\n\
              tag test-tag\n\
              tagger A. U. Thor tagger@localhost> 1 +0000\n"
        ));
    }
}
