//! Diesel schema for tracker persistence.

diesel::table! {
    /// Projects, unique by owner and name.
    projects (id) {
        /// Project identifier.
        id -> Uuid,
        /// Owning user.
        owner_id -> Uuid,
        /// Project name.
        #[max_length = 200]
        name -> Varchar,
        /// Free-form description.
        description -> Text,
        /// Creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Labels, unique by owner and name.
    labels (id) {
        /// Label identifier.
        id -> Uuid,
        /// Owning user.
        owner_id -> Uuid,
        /// Label name.
        #[max_length = 50]
        name -> Varchar,
        /// Creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Tasks; deleted with their project.
    tasks (id) {
        /// Task identifier.
        id -> Uuid,
        /// Owning user.
        owner_id -> Uuid,
        /// Parent project.
        project_id -> Uuid,
        /// Task title.
        #[max_length = 200]
        title -> Varchar,
        /// Free-form description.
        description -> Text,
        /// Workflow status.
        #[max_length = 10]
        status -> Varchar,
        /// Priority.
        #[max_length = 10]
        priority -> Varchar,
        /// Optional due date.
        due_date -> Nullable<Date>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Completion timestamp, set exactly when status is done.
        completed_at -> Nullable<Timestamptz>,
    }
}

diesel::table! {
    /// Task to label associations.
    task_labels (task_id, label_id) {
        /// Associated task.
        task_id -> Uuid,
        /// Associated label.
        label_id -> Uuid,
    }
}

diesel::table! {
    /// Comments; deleted with their task.
    comments (id) {
        /// Comment identifier.
        id -> Uuid,
        /// Commented task.
        task_id -> Uuid,
        /// Authoring user.
        author_id -> Uuid,
        /// Comment body.
        content -> Text,
        /// Creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::joinable!(tasks -> projects (project_id));
diesel::joinable!(task_labels -> tasks (task_id));
diesel::joinable!(task_labels -> labels (label_id));
diesel::joinable!(comments -> tasks (task_id));

diesel::allow_tables_to_appear_in_same_query!(projects, labels, tasks, task_labels, comments);
