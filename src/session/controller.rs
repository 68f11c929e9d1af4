use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::profile::Profile;
use crate::vision::NutritionEstimate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum View {
    ProfileIncomplete,
    Dashboard,
    AddMeal,
    ProfileEdit,
}

/// Per-session state: the profile, the screen the user is on, and the
/// estimate awaiting confirmation. One instance lives in `AppState`;
/// there are no ambient globals.
#[derive(Debug, Default)]
pub struct Session {
    profile: Option<Profile>,
    view: View,
    pending: Option<NutritionEstimate>,
}

impl Default for View {
    fn default() -> Self {
        View::ProfileIncomplete
    }
}

impl Session {
    pub fn profile(&self) -> Option<&Profile> {
        self.profile.as_ref()
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn pending(&self) -> Option<&NutritionEstimate> {
        self.pending.as_ref()
    }

    /// Validates and replaces the whole profile atomically, then lands
    /// on the dashboard.
    pub fn save_profile(&mut self, profile: Profile) -> Result<(), AppError> {
        profile.validate()?;
        self.profile = Some(profile);
        self.view = View::Dashboard;
        Ok(())
    }

    /// Switch screens. Protected views requested without a profile
    /// redirect to the profile editor. Leaving the add-meal screen
    /// drops any unconfirmed estimate, so a result arriving after the
    /// user walked away can never be applied.
    pub fn navigate(&mut self, target: View) -> Result<View, AppError> {
        if target == View::ProfileIncomplete {
            return Err(AppError::validation(
                "profile_incomplete is not a navigable view",
            ));
        }
        let resolved = if self.profile.is_none() && target != View::ProfileEdit {
            View::ProfileEdit
        } else {
            target
        };
        if self.view == View::AddMeal && resolved != View::AddMeal {
            self.pending = None;
        }
        self.view = resolved;
        Ok(resolved)
    }

    /// A fresh estimate replaces any earlier one and puts the session
    /// on the add-meal screen.
    pub fn hold_estimate(&mut self, estimate: NutritionEstimate) -> Result<(), AppError> {
        if self.profile.is_none() {
            return Err(AppError::validation(
                "complete your profile before logging meals",
            ));
        }
        self.view = View::AddMeal;
        self.pending = Some(estimate);
        Ok(())
    }

    /// The estimate confirm-save would persist. Read-only so the caller
    /// can write to the ledger first and only then commit the
    /// transition; a failed append leaves the session untouched.
    pub fn confirm_target(&self) -> Result<&NutritionEstimate, AppError> {
        if self.view != View::AddMeal {
            return Err(AppError::validation(
                "confirm-save is only available on the add-meal screen",
            ));
        }
        self.pending
            .as_ref()
            .ok_or_else(|| AppError::validation("no pending estimate to confirm"))
    }

    /// Commit the confirm transition after the ledger write succeeded.
    pub fn finish_confirm(&mut self) {
        self.pending = None;
        self.view = View::Dashboard;
    }

    /// Drop the pending estimate, staying on the current screen.
    pub fn discard_estimate(&mut self) {
        self.pending = None;
    }
}
