//! Territory and nation registries for the standard board.
//!
//! All 75 territories are encoded as a `#[repr(u8)]` enum indexing into a
//! static metadata table. The variant order is fixed (alphabetical by
//! three-letter abbreviation) and other modules rely on `as usize` being a
//! stable dense index.

use serde::Serialize;

/// Number of territories on the standard board.
pub const TERRITORY_COUNT: usize = 75;

/// The seven great powers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[repr(u8)]
pub enum Nation {
    Austria,
    England,
    France,
    Germany,
    Italy,
    Russia,
    Turkey,
}

/// Canonical nation order, used for global order numbering.
pub const ALL_NATIONS: [Nation; 7] = [
    Nation::Austria,
    Nation::England,
    Nation::France,
    Nation::Germany,
    Nation::Italy,
    Nation::Russia,
    Nation::Turkey,
];

impl Nation {
    pub const fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Nation::Austria => "Austria",
            Nation::England => "England",
            Nation::France => "France",
            Nation::Germany => "Germany",
            Nation::Italy => "Italy",
            Nation::Russia => "Russia",
            Nation::Turkey => "Turkey",
        }
    }

    /// Case-insensitive lookup by name.
    pub fn lookup(s: &str) -> Option<Nation> {
        ALL_NATIONS
            .iter()
            .copied()
            .find(|n| n.name().eq_ignore_ascii_case(s))
    }
}

/// A set of nations packed into one byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct NationSet(u8);

impl NationSet {
    pub const fn empty() -> Self {
        NationSet(0)
    }

    pub fn insert(&mut self, n: Nation) {
        self.0 |= 1 << n as u8;
    }

    pub fn remove(&mut self, n: Nation) {
        self.0 &= !(1 << n as u8);
    }

    pub const fn contains(self, n: Nation) -> bool {
        self.0 & (1 << n as u8) != 0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn iter(self) -> impl Iterator<Item = Nation> {
        ALL_NATIONS.into_iter().filter(move |n| self.contains(*n))
    }
}

impl FromIterator<Nation> for NationSet {
    fn from_iter<I: IntoIterator<Item = Nation>>(iter: I) -> Self {
        let mut set = NationSet::empty();
        for n in iter {
            set.insert(n);
        }
        set
    }
}

/// Terrain class. Armies may not enter seas, fleets may not enter inland
/// territories; coastal territories admit both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Terrain {
    Inland,
    Sea,
    Coastal,
}

/// A named coast of a bicoastal territory. `Coast::None` everywhere else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum Coast {
    #[default]
    None,
    North,
    South,
    East,
}

impl Coast {
    /// Parenthesised abbreviation as used in order notation, or `""`.
    pub fn abbr(self) -> &'static str {
        match self {
            Coast::None => "",
            Coast::North => "(nc)",
            Coast::South => "(sc)",
            Coast::East => "(ec)",
        }
    }
}

/// The 75 territories of the standard board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[repr(u8)]
pub enum Territory {
    Adr, Aeg, Alb, Ank, Apu, Arm,
    Bal, Bar, Bel, Ber, Bla, Boh,
    Bot, Bre, Bud, Bul, Bur, Cly,
    Con, Den, Eas, Edi, Eng, Fin,
    Gal, Gas, Gre, Hel, Hol, Ion,
    Iri, Kie, Lon, Lvn, Lvp, Lyo,
    Mao, Mar, Mos, Mun, Naf, Nao,
    Nap, Nth, Nwg, Nwy, Par, Pic,
    Pie, Por, Pru, Rom, Ruh, Rum,
    Ser, Sev, Sil, Ska, Smy, Spa,
    Stp, Swe, Syr, Tri, Tun, Tus,
    Tyr, Tys, Ukr, Ven, Vie, Wal,
    War, Wes, Yor,
}

struct TerrInfo {
    abbr: &'static str,
    name: &'static str,
    terrain: Terrain,
    supply: bool,
    home: Option<Nation>,
    coasts: &'static [Coast],
}

const fn sea(abbr: &'static str, name: &'static str) -> TerrInfo {
    TerrInfo { abbr, name, terrain: Terrain::Sea, supply: false, home: None, coasts: &[] }
}

const fn inland(abbr: &'static str, name: &'static str) -> TerrInfo {
    TerrInfo { abbr, name, terrain: Terrain::Inland, supply: false, home: None, coasts: &[] }
}

const fn coastal(abbr: &'static str, name: &'static str) -> TerrInfo {
    TerrInfo { abbr, name, terrain: Terrain::Coastal, supply: false, home: None, coasts: &[] }
}

/// Neutral supply center.
const fn neutral(abbr: &'static str, name: &'static str, terrain: Terrain) -> TerrInfo {
    TerrInfo { abbr, name, terrain, supply: true, home: None, coasts: &[] }
}

/// Home supply center of a great power.
const fn home(abbr: &'static str, name: &'static str, terrain: Terrain, nation: Nation) -> TerrInfo {
    TerrInfo { abbr, name, terrain, supply: true, home: Some(nation), coasts: &[] }
}

/// Bicoastal supply center (always coastal).
const fn split(
    abbr: &'static str,
    name: &'static str,
    home: Option<Nation>,
    coasts: &'static [Coast],
) -> TerrInfo {
    TerrInfo { abbr, name, terrain: Terrain::Coastal, supply: true, home, coasts }
}

#[rustfmt::skip]
static INFO: [TerrInfo; TERRITORY_COUNT] = [
    sea("ADR", "Adriatic Sea"),
    sea("AEG", "Aegean Sea"),
    coastal("ALB", "Albania"),
    home("ANK", "Ankara", Terrain::Coastal, Nation::Turkey),
    coastal("APU", "Apulia"),
    coastal("ARM", "Armenia"),
    sea("BAL", "Baltic Sea"),
    sea("BAR", "Barents Sea"),
    neutral("BEL", "Belgium", Terrain::Coastal),
    home("BER", "Berlin", Terrain::Coastal, Nation::Germany),
    sea("BLA", "Black Sea"),
    inland("BOH", "Bohemia"),
    sea("BOT", "Gulf of Bothnia"),
    home("BRE", "Brest", Terrain::Coastal, Nation::France),
    home("BUD", "Budapest", Terrain::Inland, Nation::Austria),
    split("BUL", "Bulgaria", None, &[Coast::East, Coast::South]),
    inland("BUR", "Burgundy"),
    coastal("CLY", "Clyde"),
    home("CON", "Constantinople", Terrain::Coastal, Nation::Turkey),
    neutral("DEN", "Denmark", Terrain::Coastal),
    sea("EAS", "Eastern Mediterranean"),
    home("EDI", "Edinburgh", Terrain::Coastal, Nation::England),
    sea("ENG", "English Channel"),
    coastal("FIN", "Finland"),
    inland("GAL", "Galicia"),
    coastal("GAS", "Gascony"),
    neutral("GRE", "Greece", Terrain::Coastal),
    sea("HEL", "Helgoland Bight"),
    neutral("HOL", "Holland", Terrain::Coastal),
    sea("ION", "Ionian Sea"),
    sea("IRI", "Irish Sea"),
    home("KIE", "Kiel", Terrain::Coastal, Nation::Germany),
    home("LON", "London", Terrain::Coastal, Nation::England),
    coastal("LVN", "Livonia"),
    home("LVP", "Liverpool", Terrain::Coastal, Nation::England),
    sea("LYO", "Gulf of Lyon"),
    sea("MAO", "Mid-Atlantic Ocean"),
    home("MAR", "Marseilles", Terrain::Coastal, Nation::France),
    home("MOS", "Moscow", Terrain::Inland, Nation::Russia),
    home("MUN", "Munich", Terrain::Inland, Nation::Germany),
    coastal("NAF", "North Africa"),
    sea("NAO", "North Atlantic Ocean"),
    home("NAP", "Naples", Terrain::Coastal, Nation::Italy),
    sea("NTH", "North Sea"),
    sea("NWG", "Norwegian Sea"),
    neutral("NWY", "Norway", Terrain::Coastal),
    home("PAR", "Paris", Terrain::Inland, Nation::France),
    coastal("PIC", "Picardy"),
    coastal("PIE", "Piedmont"),
    neutral("POR", "Portugal", Terrain::Coastal),
    coastal("PRU", "Prussia"),
    home("ROM", "Rome", Terrain::Coastal, Nation::Italy),
    inland("RUH", "Ruhr"),
    neutral("RUM", "Rumania", Terrain::Coastal),
    neutral("SER", "Serbia", Terrain::Inland),
    home("SEV", "Sevastopol", Terrain::Coastal, Nation::Russia),
    inland("SIL", "Silesia"),
    sea("SKA", "Skagerrak"),
    home("SMY", "Smyrna", Terrain::Coastal, Nation::Turkey),
    split("SPA", "Spain", None, &[Coast::North, Coast::South]),
    split("STP", "St. Petersburg", Some(Nation::Russia), &[Coast::North, Coast::South]),
    neutral("SWE", "Sweden", Terrain::Coastal),
    coastal("SYR", "Syria"),
    home("TRI", "Trieste", Terrain::Coastal, Nation::Austria),
    neutral("TUN", "Tunis", Terrain::Coastal),
    coastal("TUS", "Tuscany"),
    inland("TYR", "Tyrolia"),
    sea("TYS", "Tyrrhenian Sea"),
    inland("UKR", "Ukraine"),
    home("VEN", "Venice", Terrain::Coastal, Nation::Italy),
    home("VIE", "Vienna", Terrain::Inland, Nation::Austria),
    coastal("WAL", "Wales"),
    home("WAR", "Warsaw", Terrain::Inland, Nation::Russia),
    sea("WES", "Western Mediterranean"),
    coastal("YOR", "Yorkshire"),
];

/// All territories in index order.
#[rustfmt::skip]
pub const ALL_TERRITORIES: [Territory; TERRITORY_COUNT] = [
    Territory::Adr, Territory::Aeg, Territory::Alb, Territory::Ank, Territory::Apu, Territory::Arm,
    Territory::Bal, Territory::Bar, Territory::Bel, Territory::Ber, Territory::Bla, Territory::Boh,
    Territory::Bot, Territory::Bre, Territory::Bud, Territory::Bul, Territory::Bur, Territory::Cly,
    Territory::Con, Territory::Den, Territory::Eas, Territory::Edi, Territory::Eng, Territory::Fin,
    Territory::Gal, Territory::Gas, Territory::Gre, Territory::Hel, Territory::Hol, Territory::Ion,
    Territory::Iri, Territory::Kie, Territory::Lon, Territory::Lvn, Territory::Lvp, Territory::Lyo,
    Territory::Mao, Territory::Mar, Territory::Mos, Territory::Mun, Territory::Naf, Territory::Nao,
    Territory::Nap, Territory::Nth, Territory::Nwg, Territory::Nwy, Territory::Par, Territory::Pic,
    Territory::Pie, Territory::Por, Territory::Pru, Territory::Rom, Territory::Ruh, Territory::Rum,
    Territory::Ser, Territory::Sev, Territory::Sil, Territory::Ska, Territory::Smy, Territory::Spa,
    Territory::Stp, Territory::Swe, Territory::Syr, Territory::Tri, Territory::Tun, Territory::Tus,
    Territory::Tyr, Territory::Tys, Territory::Ukr, Territory::Ven, Territory::Vie, Territory::Wal,
    Territory::War, Territory::Wes, Territory::Yor,
];

impl Territory {
    pub const fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(i: usize) -> Option<Territory> {
        ALL_TERRITORIES.get(i).copied()
    }

    fn info(self) -> &'static TerrInfo {
        &INFO[self as usize]
    }

    /// Three-letter uppercase abbreviation.
    pub fn abbr(self) -> &'static str {
        self.info().abbr
    }

    /// Full display name.
    pub fn name(self) -> &'static str {
        self.info().name
    }

    pub fn terrain(self) -> Terrain {
        self.info().terrain
    }

    pub fn is_supply_center(self) -> bool {
        self.info().supply
    }

    /// The power this territory is a home center of, if any.
    pub fn home_nation(self) -> Option<Nation> {
        self.info().home
    }

    /// Named coasts (empty except Bulgaria, Spain, St. Petersburg).
    pub fn coasts(self) -> &'static [Coast] {
        self.info().coasts
    }

    pub fn is_bicoastal(self) -> bool {
        !self.coasts().is_empty()
    }

    /// Case-insensitive lookup by abbreviation or full name.
    pub fn lookup(s: &str) -> Option<Territory> {
        ALL_TERRITORIES.iter().copied().find(|t| {
            t.abbr().eq_ignore_ascii_case(s) || t.name().eq_ignore_ascii_case(s)
        })
    }
}
