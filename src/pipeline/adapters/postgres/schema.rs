//! Diesel schema for deal persistence.

diesel::table! {
    /// Deal records, scoped to a team and ordered per (team, stage) bucket.
    deals (id) {
        /// Storage-assigned deal identifier.
        id -> Int8,
        /// Owning team.
        team_id -> Uuid,
        /// Owning user.
        owner_id -> Uuid,
        /// Attached contact.
        contact_id -> Int8,
        /// Deal title.
        #[max_length = 255]
        title -> Varchar,
        /// Deal amount.
        amount -> Int8,
        /// Current pipeline stage.
        #[max_length = 20]
        stage -> Varchar,
        /// Win probability in whole percent.
        probability -> Int2,
        /// Expected close date.
        expected_close_on -> Nullable<Date>,
        /// Position within the (team, stage) bucket.
        order_index -> Int4,
        /// Reason recorded on loss.
        lost_reason -> Nullable<Text>,
        /// Soft-archive timestamp.
        archived_at -> Nullable<Timestamptz>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}
