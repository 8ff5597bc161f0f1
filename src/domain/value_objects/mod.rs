pub mod external_event_id;
pub mod timestamps;
