//! Radar statistics over a result map.
//!
//! Five fixed axes, each summed independently and clamped at
//! [`RADAR_CEILING`]. Contributions are never scaled, only clamped.

use crate::result::ProbeResult;
use lookout_core::Category;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Upper bound of every radar axis.
pub const RADAR_CEILING: u32 = 150;

const SOCIAL_POINTS: u32 = 20;
const DEV_POINTS: u32 = 25;
const CONTACT_POINTS: u32 = 50;
const GEO_POINTS: u32 = 40;
const BREACH_POINTS: u32 = 100;

/// One radar axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RadarAxis {
    /// Social network presence
    Social,
    /// Developer and gaming presence
    Dev,
    /// Exposed contact secrets
    Contact,
    /// Breach exposure
    Breach,
    /// Demographic signal
    Geo,
}

/// Fixed-axis summary of a sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RadarStats {
    /// Social axis
    #[serde(rename = "Social")]
    pub social: u32,
    /// Dev axis
    #[serde(rename = "Dev")]
    pub dev: u32,
    /// Contact axis
    #[serde(rename = "Contact")]
    pub contact: u32,
    /// Breach axis
    #[serde(rename = "Breach")]
    pub breach: u32,
    /// Geo axis
    #[serde(rename = "Geo")]
    pub geo: u32,
}

impl RadarStats {
    /// Fold every non-synthetic result into fresh stats.
    #[must_use]
    pub fn from_results<'a>(results: impl IntoIterator<Item = &'a ProbeResult>) -> Self {
        let mut stats = Self::default();
        for result in results.into_iter().filter(|r| !r.is_synthetic()) {
            stats.absorb(result);
        }
        stats
    }

    /// Stats over a platform-keyed result map.
    #[must_use]
    pub fn from_map(results: &HashMap<String, ProbeResult>) -> Self {
        Self::from_results(results.values())
    }

    fn absorb(&mut self, result: &ProbeResult) {
        if result.category == Category::Social {
            self.add(RadarAxis::Social, SOCIAL_POINTS);
        }
        if result.category.is_dev_signal() {
            self.add(RadarAxis::Dev, DEV_POINTS);
        }
        if !result.secrets().is_empty() {
            self.add(RadarAxis::Contact, CONTACT_POINTS);
        }
        if result.demographic().is_resolved() {
            self.add(RadarAxis::Geo, GEO_POINTS);
        }
        if result.breach_data.is_some() {
            self.add(RadarAxis::Breach, BREACH_POINTS);
        }
    }

    /// Add `points` to `axis`, clamping at the ceiling.
    pub fn add(&mut self, axis: RadarAxis, points: u32) {
        let slot = self.axis_mut(axis);
        *slot = slot.saturating_add(points).min(RADAR_CEILING);
    }

    /// Overwrite `axis`, clamping at the ceiling.
    pub fn set(&mut self, axis: RadarAxis, value: u32) {
        *self.axis_mut(axis) = value.min(RADAR_CEILING);
    }

    /// Current value of `axis`.
    #[must_use]
    pub fn get(&self, axis: RadarAxis) -> u32 {
        match axis {
            RadarAxis::Social => self.social,
            RadarAxis::Dev => self.dev,
            RadarAxis::Contact => self.contact,
            RadarAxis::Breach => self.breach,
            RadarAxis::Geo => self.geo,
        }
    }

    fn axis_mut(&mut self, axis: RadarAxis) -> &mut u32 {
        match axis {
            RadarAxis::Social => &mut self.social,
            RadarAxis::Dev => &mut self.dev,
            RadarAxis::Contact => &mut self.contact,
            RadarAxis::Breach => &mut self.breach,
            RadarAxis::Geo => &mut self.geo,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pivots::instagram_dork;
    use crate::result::{BreachAttachment, Demographic, MetadataBlock, Secret};
    use lookout_core::Username;

    fn hit(category: Category) -> ProbeResult {
        ProbeResult::found("P", "https://p.test/bob", category)
    }

    #[test]
    fn test_single_social_hit() {
        let stats = RadarStats::from_results(&[hit(Category::Social)]);
        assert_eq!(
            stats,
            RadarStats {
                social: 20,
                ..RadarStats::default()
            }
        );
    }

    #[test]
    fn test_dev_categories() {
        let stats = RadarStats::from_results(&[
            hit(Category::Tech),
            hit(Category::Developer),
            hit(Category::Gaming),
            hit(Category::Media),
        ]);
        assert_eq!(stats.dev, 75);
        assert_eq!(stats.social, 0);
    }

    #[test]
    fn test_every_signal_saturates() {
        let loaded = hit(Category::Social)
            .with_metadata(MetadataBlock {
                secrets: vec![Secret::email("bob@p.test")],
                demographic: Demographic::Uncertain,
                ..MetadataBlock::default()
            });
        let mut results: Vec<ProbeResult> = (0..20).map(|_| loaded.clone()).collect();
        for r in &mut results {
            r.breach_data = Some(BreachAttachment {
                compromised: true,
                sources: Vec::new(),
            });
        }
        results.extend((0..20).map(|_| hit(Category::Developer)));

        let stats = RadarStats::from_results(&results);
        for axis in [
            RadarAxis::Social,
            RadarAxis::Dev,
            RadarAxis::Contact,
            RadarAxis::Breach,
            RadarAxis::Geo,
        ] {
            assert_eq!(stats.get(axis), RADAR_CEILING, "{axis:?} not clamped");
        }
    }

    #[test]
    fn test_unknown_demographic_and_dork_ignored() {
        let dork = instagram_dork(&Username::new("bob").expect("valid username"));
        let unknown = hit(Category::Other).with_metadata(MetadataBlock::default());
        let stats = RadarStats::from_results(&[dork, unknown]);
        assert_eq!(stats, RadarStats::default());
    }

    #[test]
    fn test_add_and_set_clamp() {
        let mut stats = RadarStats::default();
        stats.add(RadarAxis::Breach, 100);
        stats.add(RadarAxis::Breach, 100);
        assert_eq!(stats.breach, 150);
        stats.set(RadarAxis::Geo, u32::MAX);
        assert_eq!(stats.geo, 150);
        stats.set(RadarAxis::Breach, 100);
        assert_eq!(stats.breach, 100);
    }

    #[test]
    fn test_serialized_axis_names() {
        let json = serde_json::to_value(RadarStats::default()).expect("serialize stats");
        for key in ["Social", "Dev", "Contact", "Breach", "Geo"] {
            assert_eq!(json[key], 0);
        }
    }
}
