//! Diesel schema for contact and task persistence.

diesel::table! {
    /// Contact records, scoped to a team.
    contacts (id) {
        /// Storage-assigned contact identifier.
        id -> Int8,
        /// Owning team.
        team_id -> Uuid,
        /// Owning user.
        owner_id -> Uuid,
        /// Person or company.
        #[max_length = 20]
        kind -> Varchar,
        /// Display name.
        #[max_length = 255]
        name -> Varchar,
        /// Company name.
        #[max_length = 255]
        company -> Nullable<Varchar>,
        /// Email address.
        #[max_length = 255]
        email -> Nullable<Varchar>,
        /// Phone number.
        #[max_length = 50]
        phone -> Nullable<Varchar>,
        /// Free-form tags as a JSON array.
        tags -> Jsonb,
        /// Contact priority.
        #[max_length = 20]
        priority -> Varchar,
        /// Follow-up status.
        #[max_length = 20]
        status -> Varchar,
        /// Free-text note.
        note -> Nullable<Text>,
        /// Desired next follow-up date.
        next_action_on -> Nullable<Date>,
        /// Timestamp of the last logged contact.
        last_contacted_at -> Nullable<Timestamptz>,
        /// Soft-archive timestamp.
        archived_at -> Nullable<Timestamptz>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Task records, scoped to a team.
    tasks (id) {
        /// Storage-assigned task identifier.
        id -> Int8,
        /// Owning team.
        team_id -> Uuid,
        /// Assigned user.
        assignee_id -> Uuid,
        /// Linked contact.
        contact_id -> Nullable<Int8>,
        /// Linked deal.
        deal_id -> Nullable<Int8>,
        /// Task title.
        #[max_length = 255]
        title -> Varchar,
        /// Task priority.
        #[max_length = 20]
        priority -> Varchar,
        /// Due date.
        due_on -> Date,
        /// Completion timestamp.
        done_at -> Nullable<Timestamptz>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::allow_tables_to_appear_in_same_query!(contacts, tasks);
