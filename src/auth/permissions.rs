//! Permission strings, one marker type per string.
//!
//! Routes name their permission in the extractor type, e.g. `Authorized<CreateItems>`.

pub trait Permission: Send + Sync + 'static {
    const NAME: &'static str;
}

macro_rules! permissions {
    ($($ty:ident => $name:literal),* $(,)?) => {
        $(
            #[derive(Debug, Clone, Copy)]
            pub struct $ty;

            impl Permission for $ty {
                const NAME: &'static str = $name;
            }
        )*

        /// Every permission string the API checks.
        pub const ALL: &[&str] = &[$($name),*];
    };
}

permissions! {
    GetMerchants => "get:merchants",
    CreateMerchants => "create:merchants",
    UpdateMerchants => "update:merchants",
    DeleteMerchants => "delete:merchants",
    GetItems => "get:items",
    CreateItems => "create:items",
    UpdateItems => "update:items",
    DeleteItems => "delete:items",
    GetCustomers => "get:customers",
    CreateCustomers => "create:customers",
    UpdateCustomers => "update:customers",
    DeleteCustomers => "delete:customers",
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_verb_colon_resource() {
        assert_eq!(CreateItems::NAME, "create:items");
        assert_eq!(ALL.len(), 12);
        for name in ALL {
            let (verb, resource) = name.split_once(':').unwrap();
            assert!(["get", "create", "update", "delete"].contains(&verb));
            assert!(["merchants", "items", "customers"].contains(&resource));
        }
    }
}
