//! Deal aggregate root and probability scale.

use super::{DealId, ProbabilityOutOfRange, Stage};
use crate::followup::domain::ContactId;
use crate::tenant::{TeamId, TenantScoped, UserId};
use chrono::{DateTime, NaiveDate, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Win probability of a deal, in whole percent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Probability(u8);

impl Probability {
    /// Certain win, forced when a deal enters [`Stage::Won`].
    pub const WON: Self = Self(100);
    /// Certain loss, forced when a deal enters [`Stage::Lost`].
    pub const LOST: Self = Self(0);

    /// Creates a validated probability.
    ///
    /// # Errors
    ///
    /// Returns [`ProbabilityOutOfRange`] when the value exceeds 100.
    pub const fn new(value: u8) -> Result<Self, ProbabilityOutOfRange> {
        if value > 100 {
            return Err(ProbabilityOutOfRange(value));
        }
        Ok(Self(value))
    }

    /// Returns the percentage value.
    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }
}

/// Deal aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deal {
    id: DealId,
    team_id: TeamId,
    owner_id: UserId,
    contact_id: ContactId,
    title: String,
    amount: u32,
    stage: Stage,
    probability: Probability,
    expected_close_on: Option<NaiveDate>,
    order_index: i32,
    lost_reason: Option<String>,
    archived_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Draft data for creating a deal; the repository assigns the identifier
/// and stamps the tenant. The order index must already be reserved through
/// the allocator for the target bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDeal {
    pub(crate) owner_id: UserId,
    pub(crate) contact_id: ContactId,
    pub(crate) title: String,
    pub(crate) amount: u32,
    pub(crate) stage: Stage,
    pub(crate) probability: Probability,
    pub(crate) expected_close_on: Option<NaiveDate>,
    pub(crate) order_index: i32,
}

impl NewDeal {
    /// Creates a draft deal with required fields.
    #[must_use]
    pub fn new(
        owner_id: UserId,
        contact_id: ContactId,
        title: impl Into<String>,
        stage: Stage,
        order_index: i32,
    ) -> Self {
        Self {
            owner_id,
            contact_id,
            title: title.into(),
            amount: 0,
            stage,
            probability: Probability::default(),
            expected_close_on: None,
            order_index,
        }
    }

    /// Sets the deal amount.
    #[must_use]
    pub const fn with_amount(mut self, amount: u32) -> Self {
        self.amount = amount;
        self
    }

    /// Sets the initial win probability.
    #[must_use]
    pub const fn with_probability(mut self, probability: Probability) -> Self {
        self.probability = probability;
        self
    }

    /// Sets the expected close date.
    #[must_use]
    pub const fn with_expected_close_on(mut self, date: NaiveDate) -> Self {
        self.expected_close_on = Some(date);
        self
    }
}

/// Parameter object for reconstructing a persisted deal aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedDealData {
    /// Persisted deal identifier.
    pub id: DealId,
    /// Owning team.
    pub team_id: TeamId,
    /// Owning user.
    pub owner_id: UserId,
    /// Attached contact.
    pub contact_id: ContactId,
    /// Deal title.
    pub title: String,
    /// Deal amount.
    pub amount: u32,
    /// Current pipeline stage.
    pub stage: Stage,
    /// Win probability.
    pub probability: Probability,
    /// Expected close date, if any.
    pub expected_close_on: Option<NaiveDate>,
    /// Position within the (team, stage) bucket.
    pub order_index: i32,
    /// Reason recorded on loss, if any.
    pub lost_reason: Option<String>,
    /// Soft-archive timestamp, if any.
    pub archived_at: Option<DateTime<Utc>>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Deal {
    /// Creates a deal from draft data. Called by repositories once the
    /// identifier has been assigned.
    #[must_use]
    pub fn create(new: NewDeal, id: DealId, team_id: TeamId, now: DateTime<Utc>) -> Self {
        Self {
            id,
            team_id,
            owner_id: new.owner_id,
            contact_id: new.contact_id,
            title: new.title,
            amount: new.amount,
            stage: new.stage,
            probability: new.probability,
            expected_close_on: new.expected_close_on,
            order_index: new.order_index,
            lost_reason: None,
            archived_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Reconstructs a deal from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedDealData) -> Self {
        Self {
            id: data.id,
            team_id: data.team_id,
            owner_id: data.owner_id,
            contact_id: data.contact_id,
            title: data.title,
            amount: data.amount,
            stage: data.stage,
            probability: data.probability,
            expected_close_on: data.expected_close_on,
            order_index: data.order_index,
            lost_reason: data.lost_reason,
            archived_at: data.archived_at,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the deal identifier.
    #[must_use]
    pub const fn id(&self) -> DealId {
        self.id
    }

    /// Returns the owning user.
    #[must_use]
    pub const fn owner_id(&self) -> UserId {
        self.owner_id
    }

    /// Returns the attached contact.
    #[must_use]
    pub const fn contact_id(&self) -> ContactId {
        self.contact_id
    }

    /// Returns the deal title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the deal amount.
    #[must_use]
    pub const fn amount(&self) -> u32 {
        self.amount
    }

    /// Returns the current pipeline stage.
    #[must_use]
    pub const fn stage(&self) -> Stage {
        self.stage
    }

    /// Returns the win probability.
    #[must_use]
    pub const fn probability(&self) -> Probability {
        self.probability
    }

    /// Returns the expected close date, if any.
    #[must_use]
    pub const fn expected_close_on(&self) -> Option<NaiveDate> {
        self.expected_close_on
    }

    /// Returns the position within the (team, stage) bucket.
    #[must_use]
    pub const fn order_index(&self) -> i32 {
        self.order_index
    }

    /// Returns the reason recorded on loss, if any.
    #[must_use]
    pub fn lost_reason(&self) -> Option<&str> {
        self.lost_reason.as_deref()
    }

    /// Returns the soft-archive timestamp, if any.
    #[must_use]
    pub const fn archived_at(&self) -> Option<DateTime<Utc>> {
        self.archived_at
    }

    /// Returns `true` when the deal is hidden from the active board.
    #[must_use]
    pub const fn is_archived(&self) -> bool {
        self.archived_at.is_some()
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Moves the deal to a new stage, applying the probability side
    /// effects: `Won` forces 100, `Lost` forces 0, anything else leaves
    /// probability untouched. When `new_index` is given it must have been
    /// reserved through the allocator for the target bucket.
    pub fn move_to_stage(&mut self, new_stage: Stage, new_index: Option<i32>, clock: &impl Clock) {
        self.stage = new_stage;
        match new_stage {
            Stage::Won => self.probability = Probability::WON,
            Stage::Lost => self.probability = Probability::LOST,
            _ => {}
        }
        if let Some(index) = new_index {
            self.order_index = index;
        }
        self.touch(clock);
    }

    /// Displaces the deal within its bucket by `by`. Used by the bulk
    /// shift path in repositories.
    pub(crate) const fn shift_order_index(&mut self, by: i32) {
        self.order_index += by;
    }

    /// Sets the win probability. Not applied on won/lost moves, where the
    /// stage transition forces the value.
    pub fn set_probability(&mut self, probability: Probability, clock: &impl Clock) {
        self.probability = probability;
        self.touch(clock);
    }

    /// Records the reason a deal was lost.
    pub fn set_lost_reason(&mut self, reason: impl Into<String>, clock: &impl Clock) {
        self.lost_reason = Some(reason.into());
        self.touch(clock);
    }

    /// Archives the deal, hiding it from the active board. Stage and
    /// probability are left unchanged; a deal may be completed from any
    /// stage.
    pub fn complete(&mut self, clock: &impl Clock) {
        self.archived_at = Some(clock.utc());
        self.touch(clock);
    }

    /// Updates the `updated_at` timestamp to the current clock time.
    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}

impl TenantScoped for Deal {
    fn team_id(&self) -> TeamId {
        self.team_id
    }
}
