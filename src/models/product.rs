use serde::{Deserialize, Serialize};

/// Entry of the external product catalog; inventory records reference it by name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub name: String,
}

impl Product {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Names of the given products, in catalog order.
pub fn product_names(products: &[Product]) -> Vec<String> {
    products.iter().map(|product| product.name.clone()).collect()
}
