//! Cryptanalysis scenarios

use super::frequency::LanguageFrequencyProfile;
use crate::error::ValidationError;
use crate::locale::Locale;
use crate::text::CanonicalKey;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

/// Classical cipher families a scenario may declare
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CipherFamily {
    /// Shift cipher, one alphabet
    Caesar,
    /// General substitution, one alphabet
    Monoalphabetic,
    /// Periodic polyalphabetic cipher
    Vigenere,
    /// Cipher-disk polyalphabetic cipher
    Alberti,
}

impl CipherFamily {
    /// Every family, in declaration order
    pub const ALL: [CipherFamily; 4] = [
        CipherFamily::Caesar,
        CipherFamily::Monoalphabetic,
        CipherFamily::Vigenere,
        CipherFamily::Alberti,
    ];

    /// Tag used in the `cipher` attribute
    pub fn tag(&self) -> &'static str {
        match self {
            CipherFamily::Caesar => "Caesar",
            CipherFamily::Monoalphabetic => "Monoalphabetic",
            CipherFamily::Vigenere => "Vigenère",
            CipherFamily::Alberti => "Alberti",
        }
    }

    /// Whether the family uses two or more substitution alphabets
    pub fn is_polyalphabetic(&self) -> bool {
        matches!(self, CipherFamily::Vigenere | CipherFamily::Alberti)
    }

    /// Check a substitution alphabet count against the family
    ///
    /// Monoalphabetic families take exactly one alphabet, polyalphabetic
    /// families at least two.
    pub fn check_alphabet_count(&self, count: usize) -> Result<(), ValidationError> {
        let (min, max) = if self.is_polyalphabetic() {
            (2, usize::MAX)
        } else {
            (1, 1)
        };
        if count < min {
            Err(ValidationError::TooFewAlphabets {
                cipher: *self,
                count,
            })
        } else if count > max {
            Err(ValidationError::TooManyAlphabets {
                cipher: *self,
                count,
            })
        } else {
            Ok(())
        }
    }
}

impl FromStr for CipherFamily {
    type Err = ValidationError;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        match tag {
            "Caesar" => Ok(CipherFamily::Caesar),
            "Monoalphabetic" => Ok(CipherFamily::Monoalphabetic),
            "Vigenère" | "Vigenere" => Ok(CipherFamily::Vigenere),
            "Alberti" => Ok(CipherFamily::Alberti),
            other => Err(ValidationError::UnknownCipherFamily(other.to_string())),
        }
    }
}

impl fmt::Display for CipherFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// One substitution alphabet: cipher character to plain character
pub type SubstitutionAlphabet = BTreeMap<CanonicalKey, CanonicalKey>;

/// Whether no alphabet sends two distinct sources to the same target
pub fn is_injective(substitution: &[SubstitutionAlphabet]) -> bool {
    substitution.iter().all(|alphabet| {
        let targets: BTreeSet<&CanonicalKey> = alphabet.values().collect();
        targets.len() == alphabet.len()
    })
}

/// A ciphertext with its declared cipher and work-in-progress substitution
#[derive(Debug, Clone, PartialEq)]
pub struct CryptanalysisScenario {
    pub(crate) cipher: CipherFamily,
    pub(crate) locale: Locale,
    pub(crate) ciphertext: String,
    pub(crate) cipher_alphabet: BTreeSet<CanonicalKey>,
    pub(crate) plain_alphabet: BTreeSet<CanonicalKey>,
    pub(crate) ignored: BTreeSet<CanonicalKey>,
    pub(crate) substitution: Vec<SubstitutionAlphabet>,
    pub(crate) substitution_is_injective: bool,
    pub(crate) language_frequencies: Option<LanguageFrequencyProfile>,
}

impl CryptanalysisScenario {
    /// Declared cipher family
    pub fn cipher(&self) -> CipherFamily {
        self.cipher
    }

    /// Locale of the plaintext
    pub fn locale(&self) -> &Locale {
        &self.locale
    }

    /// Raw ciphertext, verbatim
    pub fn ciphertext(&self) -> &str {
        &self.ciphertext
    }

    /// Characters of the cipher alphabet
    pub fn cipher_alphabet(&self) -> &BTreeSet<CanonicalKey> {
        &self.cipher_alphabet
    }

    /// Characters of the plain alphabet
    pub fn plain_alphabet(&self) -> &BTreeSet<CanonicalKey> {
        &self.plain_alphabet
    }

    /// Ciphertext characters the substitution leaves alone
    pub fn ignored(&self) -> &BTreeSet<CanonicalKey> {
        &self.ignored
    }

    /// Substitution alphabets in document order
    pub fn substitution(&self) -> &[SubstitutionAlphabet] {
        &self.substitution
    }

    /// Whether every substitution alphabet is injective
    pub fn substitution_is_injective(&self) -> bool {
        self.substitution_is_injective
    }

    /// Embedded reference statistics, if any
    pub fn language_frequencies(&self) -> Option<&LanguageFrequencyProfile> {
        self.language_frequencies.as_ref()
    }
}
