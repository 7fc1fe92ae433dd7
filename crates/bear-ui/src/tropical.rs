//! Tropical outlook panels, one per ocean basin.

use bear_core::InputError;
use bear_weather::{BackendClient, TropicalRegion};

use crate::page::SharedPage;

/// Expertise requested when the page first loads.
pub const DEFAULT_EXPERTISE: &str = "no_summary";

const TAB_GROUP_PREFIX: &str = "expertise-tabs-";

/// Expertise value for a tab label: "Novice" -> "none", "Weather Nerd" -> "weather_nerd".
pub fn expertise_from_tab_label(label: &str) -> String {
    let normalized = label.trim().to_lowercase().replacen(' ', "_", 1);
    if normalized == "novice" {
        "none".to_string()
    } else {
        normalized
    }
}

/// Region for a tab group id such as `expertise-tabs-atlantic`.
pub fn region_from_tab_group(group_id: &str) -> Result<TropicalRegion, InputError> {
    let name = group_id.strip_prefix(TAB_GROUP_PREFIX).unwrap_or(group_id);
    TropicalRegion::parse(name).ok_or_else(|| InputError::UnknownRegion(name.to_string()))
}

pub struct TropicalController {
    client: BackendClient,
    page: SharedPage,
}

impl TropicalController {
    pub fn new(client: BackendClient, page: SharedPage) -> Self {
        Self { client, page }
    }

    /// Fetch one region's summary into its panel. Any failure is logged and
    /// leaves the page unchanged.
    pub async fn fetch_summary(&self, region: TropicalRegion, expertise: &str) -> bool {
        tracing::info!(
            "Fetching tropical summary: {} | Expertise: {}",
            region.backend_name(),
            expertise
        );

        let summary = match self.client.get_tropical_summary(region, expertise).await {
            Ok(reply) => match reply.summary {
                Some(summary) => summary,
                None => {
                    tracing::warn!("No summary found for {}", region.backend_name());
                    return false;
                }
            },
            Err(e) => {
                tracing::warn!("Tropical summary for {} failed: {}", region.backend_name(), e);
                return false;
            }
        };

        let mut page = self.page.lock();
        match page.tropical.get_mut(&region) {
            Some(panel) => {
                panel.summary = summary;
                true
            }
            None => {
                tracing::warn!("Could not find summary panel for: #{}", region.panel_id());
                false
            }
        }
    }

    /// Page load: every region at the default expertise.
    pub async fn load_defaults(&self) -> usize {
        let (atlantic, eastern, central) = tokio::join!(
            self.fetch_summary(TropicalRegion::Atlantic, DEFAULT_EXPERTISE),
            self.fetch_summary(TropicalRegion::EasternPacific, DEFAULT_EXPERTISE),
            self.fetch_summary(TropicalRegion::CentralPacific, DEFAULT_EXPERTISE),
        );
        [atlantic, eastern, central].into_iter().filter(|&ok| ok).count()
    }

    /// Expertise tab pressed inside a region's tab group.
    pub async fn on_tab_click(&self, group_id: &str, label: &str) -> Result<bool, InputError> {
        let region = region_from_tab_group(group_id)?;
        Ok(self
            .fetch_summary(region, &expertise_from_tab_label(label))
            .await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tab_labels_normalize() {
        assert_eq!(expertise_from_tab_label(" Novice "), "none");
        assert_eq!(expertise_from_tab_label("Expert"), "expert");
        assert_eq!(expertise_from_tab_label("Weather Nerd"), "weather_nerd");
        assert_eq!(expertise_from_tab_label("Very Big Nerd"), "very_big nerd");
    }

    #[test]
    fn test_region_from_tab_group() {
        assert_eq!(
            region_from_tab_group("expertise-tabs-central").unwrap(),
            TropicalRegion::CentralPacific
        );
        assert_eq!(
            region_from_tab_group("expertise-tabs-Atlantic").unwrap(),
            TropicalRegion::Atlantic
        );
        assert!(matches!(
            region_from_tab_group("expertise-tabs-indian"),
            Err(InputError::UnknownRegion(name)) if name == "indian"
        ));
    }
}
