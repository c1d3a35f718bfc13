use bonsai_eval::chart::{Marker, Style};

/// The key-value stores being compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Store {
    DPTree,
    FastFair,
    ListDB,
    Pacman,
    PACTree,
    Viper,
    Bonsai,
}

impl Store {
    pub fn all() -> [Store; 7] {
        [
            Store::DPTree,
            Store::FastFair,
            Store::ListDB,
            Store::Pacman,
            Store::PACTree,
            Store::Viper,
            Store::Bonsai,
        ]
    }

    /// Name used in derived tables and in their CSV echo.
    pub fn key(&self) -> &'static str {
        match self {
            Store::DPTree => "dptree",
            Store::FastFair => "fastfair",
            Store::ListDB => "listdb",
            Store::Pacman => "pacman",
            Store::PACTree => "pactree",
            Store::Viper => "viper",
            Store::Bonsai => "bonsai",
        }
    }

    pub fn from_key(key: &str) -> Option<Store> {
        Self::all().into_iter().find(|store| store.key() == key)
    }
}

pub struct PlotFmt;

impl PlotFmt {
    pub fn store_name(store: Store) -> &'static str {
        match store {
            Store::DPTree => "DPTree",
            Store::FastFair => "FastFair",
            Store::ListDB => "ListDB",
            Store::Pacman => "PACMAN",
            Store::PACTree => "PACTree",
            Store::Viper => "Viper",
            Store::Bonsai => "Bonsai",
        }
    }

    pub fn marker(store: Store) -> Marker {
        match store {
            Store::DPTree => Marker::Square,
            Store::FastFair => Marker::TriangleUp,
            Store::ListDB => Marker::X,
            Store::Pacman => Marker::Diamond,
            Store::PACTree => Marker::TriangleLeft,
            Store::Viper => Marker::Circle,
            Store::Bonsai => Marker::Star,
        }
    }

    // Single-panel figures leave colors to matplotlib's cycle.
    pub fn color(store: Store) -> &'static str {
        match store {
            Store::DPTree => "purple",
            Store::FastFair => "green",
            Store::ListDB => "blue",
            Store::Pacman => "orange",
            Store::PACTree => "aqua",
            Store::Viper => "aqua",
            Store::Bonsai => "brown",
        }
    }

    /// Style of a store's throughput line.
    pub fn line(store: Store, marker_size: f64) -> Style {
        Style::new()
            .marker(Self::marker(store))
            .marker_size(marker_size)
            .open()
    }

    /// Like `PlotFmt::line`, with the store's color.
    pub fn colored_line(store: Store, marker_size: f64) -> Style {
        Self::line(store, marker_size).color(Self::color(store))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn keys() {
        for store in Store::all() {
            assert_eq!(Store::from_key(store.key()), Some(store));
        }
        assert_eq!(Store::from_key("rocksdb"), None);
    }

    #[test]
    fn markers_are_distinct() {
        let markers: HashSet<_> =
            Store::all().into_iter().map(PlotFmt::marker).collect();
        assert_eq!(markers.len(), Store::all().len());
    }
}
