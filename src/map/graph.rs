//! Static adjacency graph of the standard board.
//!
//! Each territory carries a fixed slice of outgoing [`Link`]s. A link
//! records which unit kinds may traverse it and, for the bicoastal
//! territories (Bulgaria, Spain, St. Petersburg), which named coast the
//! fleet leaves from or arrives at. No two bicoastal territories are
//! adjacent, so a link never carries both a from-coast and a to-coast.

use super::territory::{Coast, Territory, TERRITORY_COUNT};

/// One directed edge of the adjacency graph.
#[derive(Debug, Clone, Copy)]
pub struct Link {
    pub to: Territory,
    /// Coast a fleet must occupy at the source to use this edge.
    pub from_coast: Coast,
    /// Coast a fleet lands on at the destination.
    pub to_coast: Coast,
    pub army: bool,
    pub fleet: bool,
}

const fn a(to: Territory) -> Link {
    Link { to, from_coast: Coast::None, to_coast: Coast::None, army: true, fleet: false }
}

const fn f(to: Territory) -> Link {
    Link { to, from_coast: Coast::None, to_coast: Coast::None, army: false, fleet: true }
}

const fn b(to: Territory) -> Link {
    Link { to, from_coast: Coast::None, to_coast: Coast::None, army: true, fleet: true }
}

/// Fleet edge into a named coast of a bicoastal territory.
const fn fi(to: Territory, to_coast: Coast) -> Link {
    Link { to, from_coast: Coast::None, to_coast, army: false, fleet: true }
}

/// Fleet edge out of a named coast of a bicoastal territory.
const fn fo(from_coast: Coast, to: Territory) -> Link {
    Link { to, from_coast, to_coast: Coast::None, army: false, fleet: true }
}

use Coast::{East, North, South};
use Territory::*;

#[rustfmt::skip]
static LINKS: [&[Link]; TERRITORY_COUNT] = [
    /* Adr */ &[f(Alb), f(Apu), f(Ion), f(Tri), f(Ven)],
    /* Aeg */ &[fi(Bul, South), f(Con), f(Eas), f(Gre), f(Ion), f(Smy)],
    /* Alb */ &[f(Adr), b(Gre), f(Ion), a(Ser), b(Tri)],
    /* Ank */ &[b(Arm), f(Bla), b(Con), a(Smy)],
    /* Apu */ &[f(Adr), f(Ion), b(Nap), a(Rom), b(Ven)],
    /* Arm */ &[b(Ank), f(Bla), b(Sev), a(Smy), a(Syr)],
    /* Bal */ &[f(Ber), f(Bot), f(Den), f(Kie), f(Lvn), f(Pru), f(Swe)],
    /* Bar */ &[f(Nwg), f(Nwy), fi(Stp, North)],
    /* Bel */ &[a(Bur), f(Eng), b(Hol), f(Nth), b(Pic), a(Ruh)],
    /* Ber */ &[f(Bal), b(Kie), a(Mun), b(Pru), a(Sil)],
    /* Bla */ &[f(Ank), f(Arm), fi(Bul, East), f(Con), f(Rum), f(Sev)],
    /* Boh */ &[a(Gal), a(Mun), a(Sil), a(Tyr), a(Vie)],
    /* Bot */ &[f(Bal), f(Fin), f(Lvn), fi(Stp, South), f(Swe)],
    /* Bre */ &[f(Eng), b(Gas), f(Mao), a(Par), b(Pic)],
    /* Bud */ &[a(Gal), a(Rum), a(Ser), a(Tri), a(Vie)],
    /* Bul */ &[a(Con), a(Gre), a(Rum), a(Ser),
                fo(East, Bla), fo(East, Con), fo(East, Rum),
                fo(South, Aeg), fo(South, Con), fo(South, Gre)],
    /* Bur */ &[a(Bel), a(Gas), a(Mar), a(Mun), a(Par), a(Pic), a(Ruh)],
    /* Cly */ &[b(Edi), b(Lvp), f(Nao), f(Nwg)],
    /* Con */ &[f(Aeg), b(Ank), f(Bla), a(Bul), fi(Bul, East), fi(Bul, South), b(Smy)],
    /* Den */ &[f(Bal), f(Hel), b(Kie), f(Nth), f(Ska), b(Swe)],
    /* Eas */ &[f(Aeg), f(Ion), f(Smy), f(Syr)],
    /* Edi */ &[b(Cly), a(Lvp), f(Nth), f(Nwg), b(Yor)],
    /* Eng */ &[f(Bel), f(Bre), f(Iri), f(Lon), f(Mao), f(Nth), f(Pic), f(Wal)],
    /* Fin */ &[f(Bot), a(Nwy), a(Stp), fi(Stp, South), b(Swe)],
    /* Gal */ &[a(Boh), a(Bud), a(Rum), a(Sil), a(Ukr), a(Vie), a(War)],
    /* Gas */ &[b(Bre), a(Bur), f(Mao), a(Mar), a(Par), a(Spa), fi(Spa, North)],
    /* Gre */ &[f(Aeg), b(Alb), a(Bul), fi(Bul, South), f(Ion), a(Ser)],
    /* Hel */ &[f(Den), f(Hol), f(Kie), f(Nth)],
    /* Hol */ &[b(Bel), f(Hel), b(Kie), f(Nth), a(Ruh)],
    /* Ion */ &[f(Adr), f(Aeg), f(Alb), f(Apu), f(Eas), f(Gre), f(Nap), f(Tun), f(Tys)],
    /* Iri */ &[f(Eng), f(Lvp), f(Mao), f(Nao), f(Wal)],
    /* Kie */ &[f(Bal), b(Ber), b(Den), f(Hel), b(Hol), a(Mun), a(Ruh)],
    /* Lon */ &[f(Eng), f(Nth), b(Wal), b(Yor)],
    /* Lvn */ &[f(Bal), f(Bot), a(Mos), b(Pru), a(Stp), fi(Stp, South), a(War)],
    /* Lvp */ &[b(Cly), a(Edi), f(Iri), f(Nao), b(Wal), a(Yor)],
    /* Lyo */ &[f(Mar), f(Pie), fi(Spa, South), f(Tus), f(Tys), f(Wes)],
    /* Mao */ &[f(Bre), f(Eng), f(Gas), f(Iri), f(Naf), f(Nao), f(Por),
                fi(Spa, North), fi(Spa, South), f(Wes)],
    /* Mar */ &[a(Bur), a(Gas), f(Lyo), b(Pie), a(Spa), fi(Spa, South)],
    /* Mos */ &[a(Lvn), a(Sev), a(Stp), a(Ukr), a(War)],
    /* Mun */ &[a(Ber), a(Boh), a(Bur), a(Kie), a(Ruh), a(Sil), a(Tyr)],
    /* Naf */ &[f(Mao), b(Tun), f(Wes)],
    /* Nao */ &[f(Cly), f(Iri), f(Lvp), f(Mao), f(Nwg)],
    /* Nap */ &[b(Apu), f(Ion), b(Rom), f(Tys)],
    /* Nth */ &[f(Bel), f(Den), f(Edi), f(Eng), f(Hel), f(Hol), f(Lon),
                f(Nwg), f(Nwy), f(Ska), f(Yor)],
    /* Nwg */ &[f(Bar), f(Cly), f(Edi), f(Nao), f(Nth), f(Nwy)],
    /* Nwy */ &[f(Bar), a(Fin), f(Nth), f(Nwg), f(Ska), a(Stp), fi(Stp, North), b(Swe)],
    /* Par */ &[a(Bre), a(Bur), a(Gas), a(Pic)],
    /* Pic */ &[b(Bel), b(Bre), a(Bur), f(Eng), a(Par)],
    /* Pie */ &[f(Lyo), b(Mar), b(Tus), a(Tyr), a(Ven)],
    /* Por */ &[f(Mao), a(Spa), fi(Spa, North), fi(Spa, South)],
    /* Pru */ &[f(Bal), b(Ber), b(Lvn), a(Sil), a(War)],
    /* Rom */ &[a(Apu), b(Nap), b(Tus), f(Tys), a(Ven)],
    /* Ruh */ &[a(Bel), a(Bur), a(Hol), a(Kie), a(Mun)],
    /* Rum */ &[f(Bla), a(Bud), a(Bul), fi(Bul, East), a(Gal), a(Ser), b(Sev), a(Ukr)],
    /* Ser */ &[a(Alb), a(Bud), a(Bul), a(Gre), a(Rum), a(Tri)],
    /* Sev */ &[b(Arm), f(Bla), a(Mos), b(Rum), a(Ukr)],
    /* Sil */ &[a(Ber), a(Boh), a(Gal), a(Mun), a(Pru), a(War)],
    /* Ska */ &[f(Den), f(Nth), f(Nwy), f(Swe)],
    /* Smy */ &[f(Aeg), a(Ank), a(Arm), b(Con), f(Eas), b(Syr)],
    /* Spa */ &[a(Gas), a(Mar), a(Por),
                fo(North, Gas), fo(North, Mao), fo(North, Por),
                fo(South, Lyo), fo(South, Mao), fo(South, Mar),
                fo(South, Por), fo(South, Wes)],
    /* Stp */ &[a(Fin), a(Lvn), a(Mos), a(Nwy),
                fo(North, Bar), fo(North, Nwy),
                fo(South, Bot), fo(South, Fin), fo(South, Lvn)],
    /* Swe */ &[f(Bal), f(Bot), b(Den), b(Fin), b(Nwy), f(Ska)],
    /* Syr */ &[a(Arm), f(Eas), b(Smy)],
    /* Tri */ &[f(Adr), b(Alb), a(Bud), a(Ser), a(Tyr), b(Ven), a(Vie)],
    /* Tun */ &[f(Ion), b(Naf), f(Tys), f(Wes)],
    /* Tus */ &[f(Lyo), b(Pie), b(Rom), f(Tys), a(Ven)],
    /* Tyr */ &[a(Boh), a(Mun), a(Pie), a(Tri), a(Ven), a(Vie)],
    /* Tys */ &[f(Ion), f(Lyo), f(Nap), f(Rom), f(Tun), f(Tus), f(Wes)],
    /* Ukr */ &[a(Gal), a(Mos), a(Rum), a(Sev), a(War)],
    /* Ven */ &[f(Adr), b(Apu), a(Pie), a(Rom), b(Tri), a(Tus), a(Tyr)],
    /* Vie */ &[a(Boh), a(Bud), a(Gal), a(Tri), a(Tyr)],
    /* Wal */ &[f(Eng), f(Iri), b(Lon), b(Lvp), a(Yor)],
    /* War */ &[a(Gal), a(Lvn), a(Mos), a(Pru), a(Sil), a(Ukr)],
    /* Wes */ &[f(Lyo), f(Mao), f(Naf), fi(Spa, South), f(Tun), f(Tys)],
    /* Yor */ &[b(Edi), b(Lon), a(Lvp), f(Nth), a(Wal)],
];

/// Outgoing links of a territory.
pub fn links_from(t: Territory) -> &'static [Link] {
    LINKS[t.index()]
}

/// Whether a unit can move from `from` to `to` in one step.
///
/// For fleets, `from_coast` is the coast the fleet currently occupies
/// (`Coast::None` on ordinary territories) and `to_coast` the coast it
/// would land on; a `to_coast` of `Coast::None` accepts any coast, which
/// is what support legality checks need.
pub fn reachable(from: Territory, from_coast: Coast, to: Territory, to_coast: Coast, fleet: bool) -> bool {
    links_from(from).iter().any(|l| {
        l.to == to
            && if fleet {
                l.fleet
                    && l.from_coast == from_coast
                    && (to_coast == Coast::None || l.to_coast == to_coast)
            } else {
                l.army
            }
    })
}

/// Coasts through which a fleet at `from` can enter bicoastal `to`.
pub fn coasts_into(from: Territory, from_coast: Coast, to: Territory) -> Vec<Coast> {
    links_from(from)
        .iter()
        .filter(|l| l.fleet && l.to == to && l.from_coast == from_coast && l.to_coast != Coast::None)
        .map(|l| l.to_coast)
        .collect()
}

/// Distinct territories a unit can move to in one step.
pub fn neighbours(from: Territory, coast: Coast, fleet: bool) -> Vec<Territory> {
    let mut out: Vec<Territory> = Vec::new();
    for l in links_from(from) {
        let passable = if fleet {
            l.fleet && l.from_coast == coast
        } else {
            l.army
        };
        if passable && !out.contains(&l.to) {
            out.push(l.to);
        }
    }
    out
}
