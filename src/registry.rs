// Copyright 2026 Daniel Pelikan
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Static `category -> product -> value` tables.
//!
//! Both the product catalog and the surface mapping tables are plain
//! `static` data of this shape. Resolution is a linear scan over a handful
//! of entries and never allocates.

/// All entries of one device category.
#[derive(Debug)]
pub struct CategoryEntry<T: 'static> {
    pub category: &'static str,
    pub products: &'static [ProductEntry<T>],
    /// Used for products of this category without an entry of their own.
    pub fallback: Option<T>,
}

/// One value shared by a group of product ids.
#[derive(Debug)]
pub struct ProductEntry<T: 'static> {
    pub product_ids: &'static [&'static str],
    pub value: T,
}

/// Resolve `(category, product_id)`.
///
/// An entry for the product wins over the category fallback. Unknown
/// categories resolve to `None`.
pub fn resolve<'a, T>(
    table: &'a [CategoryEntry<T>],
    category: &str,
    product_id: &str,
) -> Option<&'a T> {
    let entry = table.iter().find(|entry| entry.category == category)?;
    entry
        .products
        .iter()
        .find(|product| product.product_ids.contains(&product_id))
        .map(|product| &product.value)
        .or(entry.fallback.as_ref())
}
