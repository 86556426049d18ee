use crate::config::decrypt::{decrypt_password, PasswordCipher, DEFAULT_DECRYPT_KEY};
use crate::config::keys::{declares, KeySpec, KeyTable};
use crate::config::ConfigNode;
use crate::value::{cast, CastFailure};

/// Findings of one validation pass, in the order they were found.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl KeyReport {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }

    pub fn extend(&mut self, other: KeyReport) {
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }
}

pub struct DecryptRequest<'a> {
    pub fields: &'a [&'a str],
    pub cipher: &'a dyn PasswordCipher,
}

#[derive(Default)]
pub struct CheckOptions<'a> {
    /// Drop every key the table does not declare once all keys are checked.
    pub filter_keys: bool,
    pub decrypt: Option<DecryptRequest<'a>>,
}

impl<'a> CheckOptions<'a> {
    pub fn filtered() -> Self {
        Self {
            filter_keys: true,
            decrypt: None,
        }
    }

    pub fn unfiltered() -> Self {
        Self::default()
    }

    pub fn with_decrypt(mut self, fields: &'a [&'a str], cipher: &'a dyn PasswordCipher) -> Self {
        self.decrypt = Some(DecryptRequest { fields, cipher });
        self
    }
}

/// Check, cast, transform and default every key of `table` on `config`, in
/// table order. A failing key never stops the pass.
pub fn validate_config(
    config: &mut ConfigNode,
    table: &KeyTable,
    options: &CheckOptions<'_>,
) -> KeyReport {
    let mut report = KeyReport::default();
    for (key, spec) in table {
        check_key(config, key, spec, &mut report);
    }

    if let Some(request) = &options.decrypt {
        for field in request.fields {
            let found = decrypt_password(config, field, DEFAULT_DECRYPT_KEY, request.cipher);
            report.extend(found);
        }
    }

    if options.filter_keys {
        config.retain(|key| declares(table, key));
    }
    report
}

fn check_key(config: &mut ConfigNode, key: &str, spec: &KeySpec, report: &mut KeyReport) {
    if spec.required.resolve(config) {
        match config.get(key) {
            None => {
                report
                    .errors
                    .push(format!("Required key '{key}' is missing from config"));
                return;
            }
            Some(value) if value.is_empty_text() => {
                report
                    .errors
                    .push(format!("Required key '{key}' can't be empty"));
                return;
            }
            Some(_) => {}
        }
    }

    let Some(slot) = config.get_mut(key) else {
        apply_default(config, key, spec, report);
        return;
    };

    if !slot.is_type(spec.expected) {
        let mismatch = format!(
            "Provided key '{key}' with type {}, it should be {}",
            slot.type_name(),
            spec.expected
        );
        match cast(slot, spec.expected) {
            Ok(casted) => {
                report
                    .warnings
                    .push(format!("{mismatch}, value was casted successfully"));
                *slot = casted;
            }
            Err(CastFailure::Undefined) => {
                report
                    .errors
                    .push(format!("{mismatch}, this value type cast is not defined"));
                return;
            }
            Err(CastFailure::Rejected) => {
                report
                    .errors
                    .push(format!("{mismatch}, value could not be casted"));
                return;
            }
        }
    }

    if let Some(transform) = spec.transform {
        match transform(slot) {
            Ok(transformed) => *slot = transformed,
            Err(message) => {
                report
                    .errors
                    .push(format!("Exception when preprocessing key '{key}': {message}"));
                return;
            }
        }
    }

    if let Some(check) = spec.check {
        match check(slot) {
            Ok(true) => {}
            Ok(false) => report.errors.push(format!(
                "Provided key '{key}' with value '{slot}' does not met validation condition"
            )),
            Err(message) => report
                .errors
                .push(format!("Exception when validating key '{key}': {message}")),
        }
    }
}

fn apply_default(config: &mut ConfigNode, key: &str, spec: &KeySpec, report: &mut KeyReport) {
    let Some(default) = spec.default else {
        return;
    };
    match default.resolve(config) {
        Ok(Some(value)) => {
            config.insert(key, value);
        }
        Ok(None) => {}
        Err(message) => report.errors.push(format!(
            "Exception when setting default value on key '{key}': {message}"
        )),
    }
}
