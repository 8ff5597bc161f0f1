pub mod payload_digest;
