use std::rc::Rc;

use serde::Deserialize;
use tracing::warn;

use crate::http::{ApiClient, decode_json};
use crate::port::ViewPort;
use crate::session::SessionService;

pub const TOP_TRACKS_FAILURE_MESSAGE: &str = "Tracks could not be loaded.";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TrackWire {
    #[serde(default)]
    title: String,
    #[serde(default)]
    artists: Vec<String>,
    #[serde(default)]
    image_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopTrackCard {
    pub title: String,
    pub artists: String,
    pub image_url: Option<String>,
}

impl From<TrackWire> for TopTrackCard {
    fn from(wire: TrackWire) -> Self {
        Self {
            title: wire.title,
            artists: wire.artists.join(", "),
            image_url: wire.image_url.filter(|url| !url.trim().is_empty()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TopTracksView {
    Loading,
    Cards(Vec<TopTrackCard>),
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopTracksOutcome {
    Skipped,
    Loaded(usize),
    Failed,
}

pub struct TopTracksLoader {
    session: Rc<SessionService>,
    api: Rc<ApiClient>,
    port: Rc<dyn ViewPort>,
}

impl TopTracksLoader {
    pub fn new(session: Rc<SessionService>, api: Rc<ApiClient>, port: Rc<dyn ViewPort>) -> Self {
        Self { session, api, port }
    }

    pub async fn load(&self) -> TopTracksOutcome {
        let Some(credential) = self.session.credential() else {
            return TopTracksOutcome::Skipped;
        };
        self.port.render_top_tracks(&TopTracksView::Loading);

        let result = self
            .api
            .get(ApiClient::TOP_TRACKS_PATH, Some(&credential))
            .await
            .and_then(|response| decode_json::<Vec<TrackWire>>(&response));
        match result {
            Ok(tracks) => {
                let cards: Vec<TopTrackCard> = tracks.into_iter().map(TopTrackCard::from).collect();
                let count = cards.len();
                self.port.render_top_tracks(&TopTracksView::Cards(cards));
                TopTracksOutcome::Loaded(count)
            }
            Err(error) => {
                if error.is_unauthorized() {
                    self.session.invalidate();
                }
                warn!(kind = error.kind().as_str(), %error, "top tracks load failed");
                self.port.render_top_tracks(&TopTracksView::Failed);
                TopTracksOutcome::Failed
            }
        }
    }
}
