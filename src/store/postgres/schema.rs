//! Diesel schema for CRM persistence.

diesel::table! {
    /// Contact records.
    contacts (id) {
        /// Contact identifier.
        id -> Uuid,
        /// Display name.
        #[max_length = 255]
        name -> Varchar,
        /// Unique email address.
        #[max_length = 255]
        email -> Varchar,
        /// Institution or company.
        #[max_length = 255]
        affiliation -> Nullable<Varchar>,
        /// Field of work.
        #[max_length = 255]
        field -> Nullable<Varchar>,
        /// Personal or professional website.
        website -> Nullable<Text>,
        /// Page where the contact was found.
        source_url -> Nullable<Text>,
        /// Confidence score.
        confidence -> Float8,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Conversations held with contacts.
    conversations (id) {
        /// Conversation identifier.
        id -> Uuid,
        /// Owning contact.
        contact_id -> Uuid,
        /// Optional subject line.
        #[max_length = 255]
        subject -> Nullable<Varchar>,
        /// Message body.
        body -> Text,
        /// Lifecycle status.
        #[max_length = 20]
        status -> Varchar,
        /// When the message was sent.
        sent_at -> Nullable<Timestamptz>,
        /// Creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Pages a contact was discovered on.
    research_sources (id) {
        /// Source identifier.
        id -> Uuid,
        /// Owning contact.
        contact_id -> Uuid,
        /// Source URL.
        url -> Text,
        /// Extraction method tag.
        #[max_length = 50]
        extraction_method -> Nullable<Varchar>,
        /// Extraction timestamp.
        extracted_at -> Timestamptz,
    }
}

diesel::table! {
    /// Research task tracking records.
    research_tasks (id) {
        /// Task identifier.
        id -> Uuid,
        /// Research query.
        query -> Text,
        /// Lifecycle state.
        #[max_length = 20]
        status -> Varchar,
        /// Number of contacts created by the run.
        results_count -> Int4,
        /// Failure text.
        error_message -> Nullable<Text>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Terminal state timestamp.
        completed_at -> Nullable<Timestamptz>,
    }
}

diesel::joinable!(conversations -> contacts (contact_id));
diesel::joinable!(research_sources -> contacts (contact_id));

diesel::allow_tables_to_appear_in_same_query!(contacts, conversations, research_sources);
