//! Product and category command handlers.

use tabled::Tabled;

use shopfront_core::{Category, Loader, Product, Resource};

use crate::cli::{CategoriesArgs, CategoriesCommand, GetArgs, ProductsArgs, ProductsCommand};
use crate::error::CliError;
use crate::output::{self, EntityView, View, field, opt};

use super::util;

fn yes_no(value: bool) -> String {
    String::from(if value { "yes" } else { "no" })
}

// ── Products ────────────────────────────────────────────────────────

#[derive(Tabled)]
pub struct ProductRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "SKU")]
    sku: String,
    #[tabled(rename = "Price")]
    price: String,
    #[tabled(rename = "Stock")]
    stock: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Active")]
    active: String,
}

impl EntityView for Product {
    type Row = ProductRow;

    fn row(&self, _view: &View) -> ProductRow {
        ProductRow {
            id: self.id.clone(),
            name: self.name.clone(),
            sku: opt(self.sku.as_deref()),
            price: util::fmt_money(self.price),
            stock: opt(self.available_stock),
            category: self
                .category_name
                .clone()
                .or_else(|| self.category_id.clone())
                .unwrap_or_default(),
            active: yes_no(self.is_active),
        }
    }

    fn detail(&self, _view: &View) -> String {
        let price = match (self.price, self.currency.as_deref()) {
            (Some(p), Some(currency)) => format!("{p:.2} {currency}"),
            (price, _) => util::fmt_money(price),
        };
        [
            field("ID", &self.id),
            field("Name", &self.name),
            field("SKU", opt(self.sku.as_deref())),
            field("Price", price),
            field("Stock", opt(self.available_stock)),
            field("In stock", yes_no(self.in_stock())),
            field("Category", opt(self.category_name.as_deref().or(self.category_id.as_deref()))),
            field("Active", yes_no(self.is_active)),
            field("Description", opt(self.description.as_deref())),
        ]
        .join("\n")
    }
}

pub async fn handle_products(
    loader: &Loader,
    args: ProductsArgs,
    view: &View,
) -> Result<(), CliError> {
    match args.command {
        ProductsCommand::List {
            list,
            category,
            active,
            public,
        } => {
            let mut params = util::list_params(&list);
            if let Some(category) = category {
                params = params.filter("categoryId", category);
            }
            if let Some(active) = active {
                params = params.filter("isActive", active);
            }
            let resource = if public {
                Resource::PublicProducts
            } else {
                Resource::Products
            };
            let page = util::current(
                loader
                    .load_page_from::<Product>(resource, "products:list", params)
                    .await,
            )?;
            output::print_output(&output::render_page(&page, view)?, view.quiet);
            Ok(())
        }

        ProductsCommand::Get(GetArgs { id }) => {
            let product = util::record(
                loader.load_detail::<Product>(&id).await,
                &id,
                "product",
                "products list",
            )?;
            output::print_output(&output::render_entity(&product, view)?, view.quiet);
            Ok(())
        }
    }
}

// ── Categories ──────────────────────────────────────────────────────

#[derive(Tabled)]
pub struct CategoryRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Slug")]
    slug: String,
    #[tabled(rename = "Products")]
    products: String,
    #[tabled(rename = "Active")]
    active: String,
}

impl EntityView for Category {
    type Row = CategoryRow;

    fn row(&self, _view: &View) -> CategoryRow {
        CategoryRow {
            id: self.id.clone(),
            name: self.name.clone(),
            slug: opt(self.slug.as_deref()),
            products: opt(self.product_count),
            active: yes_no(self.is_active),
        }
    }

    fn detail(&self, _view: &View) -> String {
        [
            field("ID", &self.id),
            field("Name", &self.name),
            field("Slug", opt(self.slug.as_deref())),
            field("Products", opt(self.product_count)),
            field("Active", yes_no(self.is_active)),
            field("Description", opt(self.description.as_deref())),
        ]
        .join("\n")
    }
}

pub async fn handle_categories(
    loader: &Loader,
    args: CategoriesArgs,
    view: &View,
) -> Result<(), CliError> {
    match args.command {
        CategoriesCommand::List { list, public } => {
            let resource = if public {
                Resource::PublicCategories
            } else {
                Resource::Categories
            };
            let page = util::current(
                loader
                    .load_page_from::<Category>(resource, "categories:list", util::list_params(&list))
                    .await,
            )?;
            output::print_output(&output::render_page(&page, view)?, view.quiet);
            Ok(())
        }

        CategoriesCommand::Get(GetArgs { id }) => {
            let category = util::record(
                loader.load_detail::<Category>(&id).await,
                &id,
                "category",
                "categories list",
            )?;
            output::print_output(&output::render_entity(&category, view)?, view.quiet);
            Ok(())
        }
    }
}
