//! Zählt BLE-Geräte in der Umgebung
//!
//! Pro Scan-Fenster werden eindeutige Advertiser-Adressen gesammelt und
//! die Anzahl über Schwellwerte einer Farbe zugeordnet.

use heapless::Vec;

use crate::palette::NamedColor;

/// BLE Geräteadresse (6 Bytes, wie im Advertising Report)
pub type DeviceAddress = [u8; 6];

/// Schwellwerte für die Einordnung der Geräteanzahl
///
/// Jeder Wert ist die kleinste Anzahl der jeweiligen Stufe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrowdThresholds {
    pub few: usize,
    pub moderate: usize,
    pub many: usize,
    pub crowd: usize,
}

impl Default for CrowdThresholds {
    fn default() -> Self {
        Self {
            few: 1,
            moderate: 3,
            many: 6,
            crowd: 10,
        }
    }
}

/// Stufe der Gerätedichte
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum CrowdLevel {
    Empty,
    Few,
    Moderate,
    Many,
    Crowd,
}

impl CrowdLevel {
    pub fn color(self) -> NamedColor {
        match self {
            CrowdLevel::Empty => NamedColor::Blue,
            CrowdLevel::Few => NamedColor::Green,
            CrowdLevel::Moderate => NamedColor::Yellow,
            CrowdLevel::Many => NamedColor::Orange,
            CrowdLevel::Crowd => NamedColor::Red,
        }
    }
}

impl CrowdThresholds {
    pub fn classify(&self, count: usize) -> CrowdLevel {
        if count >= self.crowd {
            CrowdLevel::Crowd
        } else if count >= self.many {
            CrowdLevel::Many
        } else if count >= self.moderate {
            CrowdLevel::Moderate
        } else if count >= self.few {
            CrowdLevel::Few
        } else {
            CrowdLevel::Empty
        }
    }
}

/// Ergebnis eines abgeschlossenen Scan-Fensters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanSummary {
    pub count: usize,
    pub level: CrowdLevel,
    /// Vor der Farbe einen Regenbogen zeigen
    pub celebrate: bool,
}

/// Sammelt eindeutige Adressen eines Scan-Fensters
///
/// `N` begrenzt die Anzahl gemerkter Adressen; ist der Buffer voll, wird
/// die älteste verdrängt und die Zählung sättigt bei `N`.
#[derive(Debug, Clone)]
pub struct DeviceCounter<const N: usize> {
    seen: Vec<DeviceAddress, N>,
    scan_count: u32,
    rainbow_every: u32,
    thresholds: CrowdThresholds,
}

impl<const N: usize> DeviceCounter<N> {
    /// `rainbow_every`: jedes n-te Fenster bekommt einen Regenbogen,
    /// 0 schaltet das ab
    pub fn new(thresholds: CrowdThresholds, rainbow_every: u32) -> Self {
        Self {
            seen: Vec::new(),
            scan_count: 0,
            rainbow_every,
            thresholds,
        }
    }

    /// Registriert eine Adresse, `true` wenn sie neu in diesem Fenster ist
    pub fn observe(&mut self, address: DeviceAddress) -> bool {
        if self.seen.contains(&address) {
            return false;
        }
        if self.seen.is_full() {
            self.seen.remove(0);
        }
        let _ = self.seen.push(address);
        true
    }

    /// Eindeutige Geräte im laufenden Fenster
    pub fn count(&self) -> usize {
        self.seen.len()
    }

    /// Abgeschlossene Scan-Fenster
    pub fn scan_count(&self) -> u32 {
        self.scan_count
    }

    /// Schließt das Fenster ab und beginnt ein neues
    pub fn finish_scan(&mut self) -> ScanSummary {
        let count = self.seen.len();
        self.seen.clear();
        self.scan_count = self.scan_count.wrapping_add(1);
        let celebrate = self.rainbow_every != 0 && self.scan_count % self.rainbow_every == 0;
        ScanSummary {
            count,
            level: self.thresholds.classify(count),
            celebrate,
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for CrowdLevel {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            CrowdLevel::Empty => defmt::write!(fmt, "Empty"),
            CrowdLevel::Few => defmt::write!(fmt, "Few"),
            CrowdLevel::Moderate => defmt::write!(fmt, "Moderate"),
            CrowdLevel::Many => defmt::write!(fmt, "Many"),
            CrowdLevel::Crowd => defmt::write!(fmt, "Crowd"),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for ScanSummary {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(
            fmt,
            "ScanSummary {{ count: {}, level: {}, celebrate: {} }}",
            self.count,
            self.level,
            self.celebrate
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_default_thresholds() {
        let thresholds = CrowdThresholds::default();
        assert_eq!(thresholds.classify(0), CrowdLevel::Empty);
        assert_eq!(thresholds.classify(2), CrowdLevel::Few);
        assert_eq!(thresholds.classify(3), CrowdLevel::Moderate);
        assert_eq!(thresholds.classify(9), CrowdLevel::Many);
        assert_eq!(thresholds.classify(10), CrowdLevel::Crowd);
        assert_eq!(thresholds.classify(500), CrowdLevel::Crowd);
    }

    #[test]
    fn test_observe_counts_unique() {
        let mut counter = DeviceCounter::<8>::new(CrowdThresholds::default(), 0);
        assert!(counter.observe([1; 6]));
        assert!(!counter.observe([1; 6]));
        assert!(counter.observe([2; 6]));
        assert_eq!(counter.count(), 2);
    }

    #[test]
    fn test_count_saturates_at_capacity() {
        let mut counter = DeviceCounter::<2>::new(CrowdThresholds::default(), 0);
        counter.observe([1; 6]);
        counter.observe([2; 6]);
        counter.observe([3; 6]);
        assert_eq!(counter.count(), 2);
    }

    #[test]
    fn test_finish_scan_clears_window() {
        let mut counter = DeviceCounter::<8>::new(CrowdThresholds::default(), 0);
        counter.observe([1; 6]);
        let summary = counter.finish_scan();
        assert_eq!(summary.count, 1);
        assert_eq!(summary.level, CrowdLevel::Few);
        assert!(!summary.celebrate);
        assert_eq!(counter.count(), 0);
        assert_eq!(counter.scan_count(), 1);
    }

    #[test]
    fn test_every_nth_scan_celebrates() {
        let mut counter = DeviceCounter::<8>::new(CrowdThresholds::default(), 3);
        assert!(!counter.finish_scan().celebrate);
        assert!(!counter.finish_scan().celebrate);
        assert!(counter.finish_scan().celebrate);
        assert!(!counter.finish_scan().celebrate);
    }
}
