//! Implementations of HasDependencies for primitives.

use crate::{self as sky, HasDependencies};

macro_rules! go {
    ($type: ty) => {
        impl HasDependencies for $type {}
    };
}

go!(String);
go!(u8);
go!(i8);
go!(u16);
go!(i16);
go!(u32);
go!(i32);
go!(u64);
go!(i64);
go!(u128);
go!(i128);
go!(f32);
go!(f64);
go!(bool);

impl<T: HasDependencies> HasDependencies for Vec<T> {
    fn dependencies(&self) -> sky::Dependencies {
        self.iter()
            .fold(sky::Dependencies::default(), |acc, item| {
                acc.merge(item.dependencies())
            })
    }
}

impl<K, V: HasDependencies> HasDependencies for std::collections::HashMap<K, V> {
    fn dependencies(&self) -> sky::Dependencies {
        self.values()
            .fold(sky::Dependencies::default(), |acc, item| {
                acc.merge(item.dependencies())
            })
    }
}

impl<V: HasDependencies> HasDependencies for std::collections::HashSet<V> {
    fn dependencies(&self) -> sky::Dependencies {
        self.iter()
            .fold(sky::Dependencies::default(), |acc, item| {
                acc.merge(item.dependencies())
            })
    }
}

impl<K, V: HasDependencies> HasDependencies for std::collections::BTreeMap<K, V> {
    fn dependencies(&self) -> sky::Dependencies {
        self.values()
            .fold(sky::Dependencies::default(), |acc, item| {
                acc.merge(item.dependencies())
            })
    }
}

impl<V: HasDependencies> HasDependencies for std::collections::BTreeSet<V> {
    fn dependencies(&self) -> sky::Dependencies {
        self.iter()
            .fold(sky::Dependencies::default(), |acc, item| {
                acc.merge(item.dependencies())
            })
    }
}

impl<V: HasDependencies> HasDependencies for Option<V> {
    fn dependencies(&self) -> sky::Dependencies {
        self.iter()
            .fold(sky::Dependencies::default(), |acc, item| {
                acc.merge(item.dependencies())
            })
    }
}
