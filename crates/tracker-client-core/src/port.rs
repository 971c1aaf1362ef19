use std::time::Duration;

use crate::feed::{FeedCaption, FeedRow};
use crate::profile::ProfileCard;
use crate::router::ViewDescriptor;
use crate::top_tracks::TopTracksView;

/// Rendering target for the dashboard page.
///
/// The core only ever talks to the page through this trait, so every
/// controller can run headless against a recording implementation.
pub trait ViewPort {
    fn render_view_descriptor(&self, descriptor: &ViewDescriptor);
    /// Marks the navigation control for `key` active and every other one inactive.
    fn highlight_nav(&self, key: &str);
    fn set_locked(&self, locked: bool);
    /// Replaces all feed rows; rows are never patched in place.
    fn render_feed_rows(&self, rows: &[FeedRow]);
    fn render_feed_caption(&self, caption: &FeedCaption);
    fn render_profile(&self, profile: &ProfileCard);
    fn render_top_tracks(&self, view: &TopTracksView);
    fn show_notice(&self, message: &str);
}

/// Rendering target for the sign-in page.
pub trait FeedbackPort {
    fn show_feedback(&self, message: &str);
}

/// The page address: read, rewrite in place, or leave the page.
pub trait AddressBar {
    fn current_url(&self) -> String;
    /// Rewrites the address without a history entry or reload.
    fn replace_url(&self, url: &str);
    fn redirect(&self, url: &str);
    fn redirect_after(&self, url: &str, delay: Duration);
}
