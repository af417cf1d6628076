//! Survey species codes
//!
//! The field log identifies animals by the first letters of genus and
//! species (e.g. `CALA` for *Canis latrans*).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown species code {0:?}")]
pub struct UnknownSpecies(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Species {
    Apru,
    Caca,
    Cala,
    Calufa,
    Divi,
    Feca,
    Glsp,
    Hosa,
    Loca,
    Lyru,
    Mufr,
    Odhe,
    Neto,
    Pesp,
    Prlo,
    Rasp,
    Scca,
    Syfl,
    Tado,
    Tumi,
    Ixna,
    Cyst,
    Drpi,
    Juhy,
    Pima,
    Meme,
    Coau,
    Cobr,
}

impl Species {
    pub const ALL: [Species; 28] = [
        Species::Apru,
        Species::Caca,
        Species::Cala,
        Species::Calufa,
        Species::Divi,
        Species::Feca,
        Species::Glsp,
        Species::Hosa,
        Species::Loca,
        Species::Lyru,
        Species::Mufr,
        Species::Odhe,
        Species::Neto,
        Species::Pesp,
        Species::Prlo,
        Species::Rasp,
        Species::Scca,
        Species::Syfl,
        Species::Tado,
        Species::Tumi,
        Species::Ixna,
        Species::Cyst,
        Species::Drpi,
        Species::Juhy,
        Species::Pima,
        Species::Meme,
        Species::Coau,
        Species::Cobr,
    ];

    /// Code as written in the field log
    pub fn code(&self) -> &'static str {
        match self {
            Species::Apru => "APRU",
            Species::Caca => "CACA",
            Species::Cala => "CALA",
            Species::Calufa => "CALUFA",
            Species::Divi => "DIVI",
            Species::Feca => "FECA",
            Species::Glsp => "GLSP",
            Species::Hosa => "HOSA",
            Species::Loca => "LOCA",
            Species::Lyru => "LYRU",
            Species::Mufr => "MUFR",
            Species::Odhe => "ODHE",
            Species::Neto => "NETO",
            Species::Pesp => "PESP",
            Species::Prlo => "PRLO",
            Species::Rasp => "RASP",
            Species::Scca => "SCCA",
            Species::Syfl => "SYFL",
            Species::Tado => "TADO",
            Species::Tumi => "TUMI",
            Species::Ixna => "IXNA",
            Species::Cyst => "CYST",
            Species::Drpi => "DRPI",
            Species::Juhy => "JUHY",
            Species::Pima => "PIMA",
            Species::Meme => "MEME",
            Species::Coau => "COAU",
            Species::Cobr => "COBR",
        }
    }

    pub fn common_name(&self) -> &'static str {
        match self {
            Species::Apru => "Mountain beaver",
            Species::Caca => "American beaver",
            Species::Cala => "Coyote",
            Species::Calufa => "Dog",
            Species::Divi => "Virginia opossum",
            Species::Feca => "Domestic cat",
            Species::Glsp => "Flying squirrel",
            Species::Hosa => "Human",
            Species::Loca => "River otter",
            Species::Lyru => "Bobcat",
            Species::Mufr => "Long-tailed weasel",
            Species::Odhe => "Black-tailed deer",
            Species::Neto => "Townsend’s chipmunk",
            Species::Pesp => "Deer mouse",
            Species::Prlo => "Raccoon",
            Species::Rasp => "Rat",
            Species::Scca => "Eastern gray squirrel",
            Species::Syfl => "Eastern cottontail",
            Species::Tado => "Douglas tree squirrel",
            Species::Tumi => "American robin",
            Species::Ixna => "Varied thrush",
            Species::Cyst => "Steller’s jay",
            Species::Drpi => "Pileated woodpecker",
            Species::Juhy => "Dark-eyed junco",
            Species::Pima => "Spotted towhee",
            Species::Meme => "Song sparrow",
            Species::Coau => "Northern flicker",
            Species::Cobr => "American crow",
        }
    }
}

impl FromStr for Species {
    type Err = UnknownSpecies;

    fn from_str(code: &str) -> Result<Self, Self::Err> {
        Species::ALL
            .into_iter()
            .find(|species| species.code() == code)
            .ok_or_else(|| UnknownSpecies(code.to_string()))
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.common_name())
    }
}
