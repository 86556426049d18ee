mod decrypt;
mod keys;
mod node;
mod parse;
pub mod schedule;
pub mod tables;
mod validate;

pub use decrypt::{decrypt_password, JasyptCipher, PasswordCipher, DEFAULT_DECRYPT_KEY};
pub use keys::{declares, Check, DefaultValue, KeySpec, KeyTable, Predicate, Producer, Required, Transform};
pub use node::ConfigNode;
pub use parse::{parse_properties, parse_properties_str};
pub use validate::{validate_config, CheckOptions, DecryptRequest, KeyReport};
