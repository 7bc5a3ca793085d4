//! GitHub webhook key loading and signature validation

pub mod keys;
pub mod label;
pub mod validator;
pub mod verify;

pub use keys::{branch_label, label_field, load_key, load_key_dictionary, resolve_key_files};
pub use label::{parse_key_label_from_branch, BranchLabel, LabelExtractor};
pub use validator::{delivery_id, RequestValidator};
pub use verify::{compute_signature, format_signature_header, verify_signature, Algorithm};
