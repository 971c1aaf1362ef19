use std::rc::Rc;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::ClientError;
use crate::http::{ApiClient, decode_json};
use crate::port::ViewPort;
use crate::session::SessionService;

const DEFAULT_PLAN_LABEL: &str = "Spotify";

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProfileWire {
    display_name: Option<String>,
    followers: Option<u64>,
    image_url: Option<String>,
    product: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Avatar {
    Image(String),
    Initials(String),
    Blank,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileCard {
    pub display_name: Option<String>,
    pub avatar: Avatar,
    pub followers: Option<u64>,
    pub plan_label: String,
}

impl ProfileCard {
    fn from_wire(wire: ProfileWire) -> Self {
        let display_name = wire
            .display_name
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty());
        let avatar = match (wire.image_url.filter(|url| !url.trim().is_empty()), &display_name) {
            (Some(url), _) => Avatar::Image(url),
            (None, Some(name)) => Avatar::Initials(initials(name)),
            (None, None) => Avatar::Blank,
        };
        Self {
            avatar,
            display_name,
            followers: wire.followers,
            plan_label: plan_label(wire.product.as_deref()),
        }
    }

    #[must_use]
    pub fn followers_text(&self) -> Option<String> {
        self.followers.map(format_followers)
    }
}

/// Capitalized subscription tier, e.g. `premium` -> `Premium`.
#[must_use]
pub fn plan_label(product: Option<&str>) -> String {
    let Some(product) = product.map(str::trim).filter(|product| !product.is_empty()) else {
        return DEFAULT_PLAN_LABEL.to_string();
    };
    let lower = product.to_lowercase();
    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => DEFAULT_PLAN_LABEL.to_string(),
    }
}

#[must_use]
pub fn initials(display_name: &str) -> String {
    display_name.trim().chars().take(2).collect::<String>().to_uppercase()
}

#[must_use]
pub fn format_followers(count: u64) -> String {
    let digits = count.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped
}

/// Loads the linked account's profile for the dashboard hero.
pub struct ProfileLoader {
    session: Rc<SessionService>,
    api: Rc<ApiClient>,
    port: Rc<dyn ViewPort>,
}

impl ProfileLoader {
    pub fn new(session: Rc<SessionService>, api: Rc<ApiClient>, port: Rc<dyn ViewPort>) -> Self {
        Self { session, api, port }
    }

    /// Renders the profile when it loads. Failures leave the hero as it was
    /// and are handed back; a 401 also invalidates the session.
    pub async fn load(&self) -> Result<Option<ProfileCard>, ClientError> {
        let Some(credential) = self.session.credential() else {
            debug!("no credential; skipping profile load");
            return Ok(None);
        };
        let result = self
            .api
            .get(ApiClient::PROFILE_PATH, Some(&credential))
            .await
            .and_then(|response| decode_json::<ProfileWire>(&response));
        match result {
            Ok(wire) => {
                let card = ProfileCard::from_wire(wire);
                self.port.render_profile(&card);
                Ok(Some(card))
            }
            Err(error) => {
                if error.is_unauthorized() {
                    self.session.invalidate();
                }
                warn!(kind = error.kind().as_str(), %error, "profile load failed");
                Err(error)
            }
        }
    }
}
