//! Synthetic value generation
//!
//! Produces the replacement value for each sensitivity label. Generation is
//! intentionally random: consistency comes from the mapping store caching
//! the first generated value per (original, type) key, not from seeding.

use crate::domain::SensitivityLabel;
use fake::faker::creditcard::raw::CreditCardNumber;
use fake::faker::internet::raw::{FreeEmail, Username};
use fake::faker::lorem::raw::Word;
use fake::faker::name::raw::Name;
use fake::faker::phone_number::raw::PhoneNumber;
use fake::locales::{EN, PT_BR};
use fake::Fake;
use rand::Rng;
use sha2::{Digest, Sha256};
use std::fmt;

/// Locale used for generated names, emails and phone numbers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LocaleKey {
    EnUs,
    PtBr,
}

impl LocaleKey {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "en_US" => Some(Self::EnUs),
            "pt_BR" => Some(Self::PtBr),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::EnUs => "en_US",
            Self::PtBr => "pt_BR",
        }
    }
}

impl fmt::Display for LocaleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fake value generator, keyed by sensitivity label.
#[derive(Debug, Clone, Copy)]
pub struct FakeValueGenerator {
    locale: LocaleKey,
}

impl FakeValueGenerator {
    pub fn new(locale: LocaleKey) -> Self {
        Self { locale }
    }

    /// Generate a replacement for `original` under the given label.
    ///
    /// The original value only influences the CPF/CNPJ branch: more than 11
    /// digits, or a literal `/`, means the original looked like a CNPJ and
    /// the fake takes that shape. The fake digits themselves are always
    /// independent of the original.
    pub fn generate(&self, label: SensitivityLabel, original: &str) -> String {
        match label {
            SensitivityLabel::Name => match self.locale {
                LocaleKey::PtBr => Name(PT_BR).fake(),
                LocaleKey::EnUs => Name(EN).fake(),
            },
            SensitivityLabel::Email => match self.locale {
                LocaleKey::PtBr => FreeEmail(PT_BR).fake(),
                LocaleKey::EnUs => FreeEmail(EN).fake(),
            },
            SensitivityLabel::CpfCnpj => {
                let digit_count = original.chars().filter(|c| c.is_ascii_digit()).count();
                if digit_count > 11 || original.contains('/') {
                    fake_cnpj()
                } else {
                    fake_cpf()
                }
            }
            SensitivityLabel::Phone => match self.locale {
                LocaleKey::PtBr => PhoneNumber(PT_BR).fake(),
                LocaleKey::EnUs => PhoneNumber(EN).fake(),
            },
            SensitivityLabel::Login => match self.locale {
                LocaleKey::PtBr => Username(PT_BR).fake(),
                LocaleKey::EnUs => Username(EN).fake(),
            },
            SensitivityLabel::CreditCard => CreditCardNumber(EN).fake(),
            SensitivityLabel::Token => fake_token(),
            // NON_SENSITIVE is never a target, but a defensive caller still
            // gets a harmless filler word back
            SensitivityLabel::NonSensitive => match self.locale {
                LocaleKey::PtBr => Word(PT_BR).fake(),
                LocaleKey::EnUs => Word(EN).fake(),
            },
        }
    }
}

/// Random CPF-shaped string: ###.###.###-##
fn fake_cpf() -> String {
    let d = random_digits(11);
    format!(
        "{}{}{}.{}{}{}.{}{}{}-{}{}",
        d[0], d[1], d[2], d[3], d[4], d[5], d[6], d[7], d[8], d[9], d[10]
    )
}

/// Random CNPJ-shaped string: ##.###.###/####-##
fn fake_cnpj() -> String {
    let d = random_digits(14);
    format!(
        "{}{}.{}{}{}.{}{}{}/{}{}{}{}-{}{}",
        d[0], d[1], d[2], d[3], d[4], d[5], d[6], d[7], d[8], d[9], d[10], d[11], d[12], d[13]
    )
}

/// 20-character hex-like token derived from random bytes.
fn fake_token() -> String {
    let mut rng = rand::rng();
    let seed: [u8; 16] = rng.random();
    let digest = Sha256::digest(seed);
    let hex: String = digest.iter().map(|b| format!("{b:02x}")).collect();
    hex[..20].to_string()
}

fn random_digits(count: usize) -> Vec<u8> {
    let mut rng = rand::rng();
    (0..count).map(|_| rng.random_range(0..10u8)).collect()
}
