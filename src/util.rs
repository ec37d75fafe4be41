use std::io::{self, Write};

use anyhow::{Context, Result};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;

pub fn now_utc_string() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

pub fn write_json_stdout<T: Serialize>(value: &T) -> Result<()> {
    let mut output = io::BufWriter::new(io::stdout().lock());
    serde_json::to_writer_pretty(&mut output, value).context("failed to serialize json output")?;
    writeln!(output)?;
    output.flush()?;
    Ok(())
}

// Characters `encodeURIComponent` leaves alone that `urlencoding` escapes.
const KEPT_MARKS: [(&str, &str); 5] = [
    ("%21", "!"),
    ("%2A", "*"),
    ("%27", "'"),
    ("%28", "("),
    ("%29", ")"),
];

pub fn encode_uri_component(input: &str) -> String {
    KEPT_MARKS
        .iter()
        .fold(urlencoding::encode(input).into_owned(), |encoded, (escape, mark)| {
            encoded.replace(escape, mark)
        })
}

pub fn decode_uri_component(input: &str) -> Option<String> {
    urlencoding::decode(input).ok().map(|decoded| decoded.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_uri_component_escapes_reserved_characters() {
        assert_eq!(encode_uri_component("urn:a1"), "urn%3Aa1");
        assert_eq!(
            encode_uri_component("http://x.org/onto#Random Forest"),
            "http%3A%2F%2Fx.org%2Fonto%23Random%20Forest"
        );
        assert_eq!(encode_uri_component("a-b_c.d!e~f*g'h(i)"), "a-b_c.d!e~f*g'h(i)");
        assert_eq!(encode_uri_component("é"), "%C3%A9");
    }

    #[test]
    fn decode_uri_component_reverses_encoding() {
        assert_eq!(decode_uri_component("urn%3Aa1").as_deref(), Some("urn:a1"));
        assert_eq!(decode_uri_component("%C3%A9").as_deref(), Some("é"));
        assert_eq!(decode_uri_component("plain").as_deref(), Some("plain"));
    }

    #[test]
    fn decode_uri_component_keeps_malformed_escapes_and_rejects_bad_utf8() {
        assert_eq!(decode_uri_component("bad%2").as_deref(), Some("bad%2"));
        assert_eq!(decode_uri_component("bad%zz").as_deref(), Some("bad%zz"));
        assert_eq!(decode_uri_component("%FF"), None);
    }
}
