//! Default source selection

use crate::models::{Reliability, StreamSource};
use crate::provider::{RIVESTREAM_SERVER_2_ID, VIDJOY_PLAYER_ID};

/// Pick the source a watch page opens with.
///
/// First match wins: the Vidjoy player, the Rivestream server 2 player, the
/// first `Premium` source, then the first source. Only the last rule depends
/// on list order.
#[must_use]
pub fn select_default(sources: &[StreamSource]) -> Option<&StreamSource> {
    sources
        .iter()
        .find(|s| s.id == VIDJOY_PLAYER_ID)
        .or_else(|| sources.iter().find(|s| s.id == RIVESTREAM_SERVER_2_ID))
        .or_else(|| sources.iter().find(|s| s.reliability == Reliability::Premium))
        .or_else(|| sources.first())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{stream_source, stream_source_with};

    fn premium(id: &str) -> StreamSource {
        stream_source_with(id, Reliability::Premium)
    }

    #[test]
    fn test_empty_and_single() {
        assert!(select_default(&[]).is_none());

        let only = stream_source("vidsrc_550");
        assert_eq!(select_default(std::slice::from_ref(&only)), Some(&only));
    }

    #[test]
    fn test_priority_rules() {
        let sources = vec![
            stream_source("vidsrc_550"),
            premium("primary_hd"),
            stream_source(RIVESTREAM_SERVER_2_ID),
            stream_source(VIDJOY_PLAYER_ID),
        ];
        assert_eq!(select_default(&sources).unwrap().id, VIDJOY_PLAYER_ID);
        assert_eq!(select_default(&sources[..3]).unwrap().id, RIVESTREAM_SERVER_2_ID);
        assert_eq!(select_default(&sources[..2]).unwrap().id, "primary_hd");
        assert_eq!(select_default(&sources[..1]).unwrap().id, "vidsrc_550");
    }

    #[test]
    fn test_premium_wins_in_any_position() {
        let mut sources = vec![
            stream_source("a"),
            stream_source("b"),
            premium("p"),
            stream_source("c"),
        ];
        for _ in 0..sources.len() {
            sources.rotate_left(1);
            assert_eq!(select_default(&sources).unwrap().id, "p");
        }
    }

    #[test]
    fn test_first_premium_breaks_ties() {
        let sources = vec![stream_source("a"), premium("p1"), premium("p2")];
        assert_eq!(select_default(&sources).unwrap().id, "p1");
    }

    #[test]
    fn test_input_not_mutated() {
        let sources = vec![stream_source("a"), premium("p")];
        let before = sources.clone();
        let _ = select_default(&sources);
        assert_eq!(sources, before);
    }
}
