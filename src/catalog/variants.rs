use super::{ProductDetails, Variant};

/// Two-step RAM then storage choice over a product's variants
///
/// Choosing a RAM size resets the storage choice. The variant is resolved once both match.
#[derive(Debug, Clone)]
pub struct VariantPicker<'a> {
    variants: &'a [Variant],
    ram: Option<String>,
    storage: Option<String>,
}

impl<'a> VariantPicker<'a> {
    pub fn new(product: &'a ProductDetails) -> Self {
        Self {
            variants: &product.variants,
            ram: None,
            storage: None,
        }
    }

    /// Distinct RAM sizes in the order the backend lists them
    pub fn ram_options(&self) -> Vec<&'a str> {
        distinct(self.variants.iter().filter_map(Variant::ram))
    }

    /// Distinct storage sizes for the chosen RAM
    pub fn storage_options(&self) -> Vec<&'a str> {
        match self.ram.as_deref() {
            Some(ram) => distinct(
                self.variants
                    .iter()
                    .filter(|v| v.ram() == Some(ram))
                    .filter_map(Variant::storage),
            ),
            None => Vec::new(),
        }
    }

    /// Returns false when no variant has this RAM size
    pub fn select_ram(&mut self, ram: &str) -> bool {
        if !self.variants.iter().any(|v| v.ram() == Some(ram)) {
            return false;
        }
        self.ram = Some(ram.to_string());
        self.storage = None;
        true
    }

    /// Returns false when no RAM is chosen or the storage size does not exist for it
    pub fn select_storage(&mut self, storage: &str) -> bool {
        if !self.storage_options().contains(&storage) {
            return false;
        }
        self.storage = Some(storage.to_string());
        true
    }

    pub fn selected_ram(&self) -> Option<&str> {
        self.ram.as_deref()
    }

    pub fn selected_storage(&self) -> Option<&str> {
        self.storage.as_deref()
    }

    pub fn variant(&self) -> Option<&'a Variant> {
        let (ram, storage) = (self.ram.as_deref()?, self.storage.as_deref()?);
        self.variants
            .iter()
            .find(|v| v.ram() == Some(ram) && v.storage() == Some(storage))
    }
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    let mut seen = Vec::new();
    for value in values {
        if !seen.contains(&value) {
            seen.push(value);
        }
    }
    seen
}
