use serde::{Deserialize, Serialize};

use crate::calendar::CalendarDay;
use crate::dashboard::DashboardSummary;
use crate::error::{Result, SharedError};
use crate::heatmap::{HeatmapPage, HeatmapWindow};
use crate::models::platform::Platform;
use crate::streak::StreakState;

/// `?refresh=codeforces,leetcode` or `?refresh=all`, plus `?window=N` to page the
/// heatmap back N nine-month steps.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashboardQuery {
    #[serde(default)]
    pub refresh: Option<String>,
    #[serde(default)]
    pub window: u32,
}

impl DashboardQuery {
    /// Platforms whose cached payloads must be ignored.
    pub fn refresh_targets(&self) -> Result<Vec<Platform>> {
        let Some(raw) = self.refresh.as_deref() else {
            return Ok(Vec::new());
        };

        let mut targets = Vec::new();
        for part in raw.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            if part.eq_ignore_ascii_case("all") {
                return Ok(Platform::ALL.to_vec());
            }
            let platform = Platform::from_slug(part)
                .ok_or_else(|| SharedError::BadRequest(format!("unknown platform '{}'", part)))?;
            if !targets.contains(&platform) {
                targets.push(platform);
            }
        }
        Ok(targets)
    }

    pub fn heatmap_window(&self, today: CalendarDay) -> Result<HeatmapWindow> {
        HeatmapWindow::for_offset(today, self.window)
            .ok_or_else(|| SharedError::BadRequest(format!("heatmap window {} is out of range", self.window)))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub user_id: String,
    pub generated_on: CalendarDay,
    pub streaks: StreakState,
    pub heatmap_page: HeatmapPage,
    #[serde(flatten)]
    pub summary: DashboardSummary,
}
