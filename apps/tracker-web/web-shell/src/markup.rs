use tracker_client_core::top_tracks::TOP_TRACKS_FAILURE_MESSAGE;
use tracker_client_core::{Avatar, FeedRow, TopTracksView};

pub(crate) const TOP_TRACKS_LOADING_MESSAGE: &str = "Loading your top tracks ...";

/// Text for the four cells of one chart row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RowCells {
    pub(crate) pill: String,
    pub(crate) title: String,
    pub(crate) subtitle: String,
    pub(crate) trailing: String,
}

pub(crate) fn row_cells(row: &FeedRow) -> RowCells {
    match row {
        FeedRow::Entry(entry) => RowCells {
            pill: format!("#{}", entry.rank),
            title: entry.title.clone(),
            subtitle: entry.subtitle.clone(),
            trailing: entry.external_id.clone(),
        },
        FeedRow::Empty => RowCells {
            pill: "\u{2014}".to_string(),
            title: "No data".to_string(),
            subtitle: "No snapshot is available yet.".to_string(),
            trailing: String::new(),
        },
        FeedRow::Error => RowCells {
            pill: "!".to_string(),
            title: "Error".to_string(),
            subtitle: "The chart could not be loaded.".to_string(),
            trailing: String::new(),
        },
    }
}

/// How the avatar element should look.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct AvatarStyle {
    pub(crate) background_image: String,
    pub(crate) text: String,
    pub(crate) has_image: bool,
}

pub(crate) fn avatar_style(avatar: &Avatar) -> Option<AvatarStyle> {
    match avatar {
        Avatar::Image(url) => Some(AvatarStyle {
            background_image: css_url(url),
            text: String::new(),
            has_image: true,
        }),
        Avatar::Initials(initials) => Some(AvatarStyle {
            background_image: String::new(),
            text: initials.clone(),
            has_image: false,
        }),
        Avatar::Blank => None,
    }
}

/// Quotes a URL for use in a CSS `url()` value.
pub(crate) fn css_url(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len() + 7);
    escaped.push_str("url(\"");
    for ch in raw.chars() {
        match ch {
            '"' | '\\' => {
                escaped.push('\\');
                escaped.push(ch);
            }
            '\n' | '\r' => {}
            _ => escaped.push(ch),
        }
    }
    escaped.push_str("\")");
    escaped
}

/// The single status line shown instead of cards, if any.
pub(crate) fn top_tracks_status(view: &TopTracksView) -> Option<&'static str> {
    match view {
        TopTracksView::Loading => Some(TOP_TRACKS_LOADING_MESSAGE),
        TopTracksView::Failed => Some(TOP_TRACKS_FAILURE_MESSAGE),
        TopTracksView::Cards(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracker_client_core::FeedEntry;

    #[test]
    fn entry_rows_show_rank_title_artist_and_id() {
        let row = FeedRow::Entry(FeedEntry {
            rank: 3,
            title: "Song".to_string(),
            subtitle: "Artist".to_string(),
            external_id: "trk-3".to_string(),
        });
        assert_eq!(
            row_cells(&row),
            RowCells {
                pill: "#3".to_string(),
                title: "Song".to_string(),
                subtitle: "Artist".to_string(),
                trailing: "trk-3".to_string(),
            }
        );
    }

    #[test]
    fn terminal_rows_have_fixed_copy() {
        assert_eq!(row_cells(&FeedRow::Empty).title, "No data");
        assert_eq!(row_cells(&FeedRow::Error).pill, "!");
        assert!(row_cells(&FeedRow::Error).trailing.is_empty());
    }

    #[test]
    fn css_url_escapes_quotes_and_drops_newlines() {
        assert_eq!(
            css_url("https://img.test/a.png"),
            "url(\"https://img.test/a.png\")"
        );
        assert_eq!(
            css_url("https://img.test/\"x\")\n"),
            "url(\"https://img.test/\\\"x\\\")\")"
        );
    }

    #[test]
    fn avatar_styles_follow_the_profile() {
        let style = avatar_style(&Avatar::Initials("AD".to_string())).expect("initials style");
        assert_eq!(style.text, "AD");
        assert!(!style.has_image);
        assert!(
            avatar_style(&Avatar::Image("https://img.test/a.png".to_string()))
                .is_some_and(|style| style.has_image)
        );
        assert_eq!(avatar_style(&Avatar::Blank), None);
    }

    #[test]
    fn top_tracks_status_lines() {
        assert_eq!(
            top_tracks_status(&TopTracksView::Failed),
            Some("Tracks could not be loaded.")
        );
        assert_eq!(top_tracks_status(&TopTracksView::Cards(Vec::new())), None);
    }
}
