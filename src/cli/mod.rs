//! Terminal front end - one subcommand per page or flow.
//!
//! Each command drives the same views and flows a graphical front end would, prints
//! the resulting page, and follows the flow's navigation target once it finishes.

/// Text rendering of each page
pub mod pages;
/// Yes/no confirmation on the terminal
pub mod prompt;

use crate::{
    core::{
        catalog::{CatalogView, ListCriteria, SortDirection, SortKey},
        detail::{DetailState, DetailView},
        flows::{CreateFlow, CreateState, DeleteFlow, DeleteTarget, EditFlow, EditState, ViewScope},
        gateway::ProductGateway,
        product::{Category, ProductId},
        routes::Route,
        validation::{Field, ProductForm},
    },
    errors::{Error, Result},
};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing::{debug, instrument};

/// Command-line arguments.
#[derive(Debug, Parser)]
#[command(name = "inventario", version, about = "Inventory catalog over a remote product store")]
pub struct Cli {
    /// Settings file; missing files fall back to defaults
    #[arg(long, short, default_value = "inventario.toml")]
    pub config: PathBuf,

    /// Page or action to run
    #[command(subcommand)]
    pub command: Command,
}

/// One subcommand per page or flow.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Home page with the featured products
    Home,
    /// Product list with search, category filter and sorting
    List(ListArgs),
    /// Detail page of one product
    Show {
        /// Product id
        id: String,
    },
    /// Create a product
    Create(ProductArgs),
    /// Edit a product; fields left out keep their stored value
    Edit {
        /// Product id
        id: String,
        /// New field values
        #[command(flatten)]
        fields: ProductArgs,
        /// Save without asking for confirmation
        #[arg(long, short)]
        yes: bool,
    },
    /// Delete a product after confirmation
    Delete {
        /// Product id
        id: String,
        /// Delete without asking for confirmation
        #[arg(long, short)]
        yes: bool,
    },
    /// Open a page by path, e.g. `/productos` or `/producto/{id}`
    Open {
        /// Page path
        path: String,
    },
}

/// Catalog criteria.
#[derive(Debug, Default, Args)]
pub struct ListArgs {
    /// Case-insensitive name search
    #[arg(long, short, default_value = "")]
    pub search: String,
    /// Only this category (exact label, e.g. "Hogar")
    #[arg(long, short)]
    pub category: Option<Category>,
    /// Sort field: name, price or stock
    #[arg(long, default_value = "name")]
    pub sort: SortKey,
    /// Sort direction: asc or desc
    #[arg(long, default_value = "asc")]
    pub order: SortDirection,
}

impl ListArgs {
    /// The criteria these arguments select.
    #[must_use]
    pub fn criteria(&self) -> ListCriteria {
        ListCriteria {
            search_term: self.search.clone(),
            category: self.category,
            sort_key: self.sort,
            sort_direction: self.order,
        }
    }
}

/// Product fields as typed on the command line. Validation happens in the flow.
#[derive(Clone, Debug, Default, Args)]
pub struct ProductArgs {
    /// Product name
    #[arg(long)]
    pub name: Option<String>,
    /// Brand
    #[arg(long)]
    pub brand: Option<String>,
    /// Category label
    #[arg(long)]
    pub category: Option<String>,
    /// Unit price
    #[arg(long)]
    pub price: Option<String>,
    /// Units on hand
    #[arg(long)]
    pub stock: Option<String>,
    /// Description
    #[arg(long)]
    pub description: Option<String>,
    /// Image URL
    #[arg(long)]
    pub image_url: Option<String>,
}

impl ProductArgs {
    fn value(&self, field: Field) -> Option<&String> {
        match field {
            Field::Name => self.name.as_ref(),
            Field::Brand => self.brand.as_ref(),
            Field::Category => self.category.as_ref(),
            Field::Price => self.price.as_ref(),
            Field::Stock => self.stock.as_ref(),
            Field::Description => self.description.as_ref(),
            Field::ImageUrl => self.image_url.as_ref(),
        }
    }

    /// Overwrites the fields that were given, leaving the rest untouched.
    pub fn apply_to(&self, form: &mut ProductForm) {
        for field in Field::ALL {
            if let Some(value) = self.value(field) {
                form.field_mut(field).clone_from(value);
            }
        }
    }
}

/// Runs one command against `gateway`, printing pages to stdout.
///
/// # Errors
/// Returns the store or validation error that ended the command. Its feedback has
/// already been printed.
pub async fn run(command: Command, gateway: &dyn ProductGateway) -> Result<()> {
    match command {
        Command::Home => show(&Route::Home, gateway).await,
        Command::List(args) => show_catalog(gateway, args.criteria()).await,
        Command::Show { id } => show(&Route::Detail(ProductId::new(id)), gateway).await,
        Command::Create(fields) => create(gateway, &fields).await,
        Command::Edit { id, fields, yes } => edit(gateway, ProductId::new(id), &fields, yes).await,
        Command::Delete { id, yes } => delete(gateway, ProductId::new(id), yes).await,
        Command::Open { path } => {
            let route = Route::parse(&path);
            debug!("Opening {path} as {route:?}");
            if route == Route::NotFound {
                print!("{}", pages::page_not_found(&path));
                return Ok(());
            }
            show(&route, gateway).await
        }
    }
}

/// Renders the page behind `route`.
async fn show(route: &Route, gateway: &dyn ProductGateway) -> Result<()> {
    match route {
        Route::Home => {
            let products = gateway
                .list_all()
                .await
                .inspect_err(|e| println!("❌ Could not load products: {e}"))?;
            print!("{}", pages::home(&products)?);
            Ok(())
        }
        Route::Catalog => show_catalog(gateway, ListCriteria::default()).await,
        Route::Detail(id) => show_detail(gateway, id.clone()).await,
        Route::Create => {
            print!("{}", pages::form("New product", &ProductForm::default(), None)?);
            println!("\nFill it in with `inventario create --name ... --brand ...`");
            Ok(())
        }
        Route::Edit(id) => show_edit_form(gateway, id.clone()).await,
        Route::NotFound => {
            print!("{}", pages::page_not_found(&route.path()));
            Ok(())
        }
    }
}

async fn follow(route: Option<Route>, gateway: &dyn ProductGateway) -> Result<()> {
    let Some(route) = route else {
        return Ok(());
    };
    println!("\n→ {route}\n");
    show(&route, gateway).await
}

async fn show_catalog(gateway: &dyn ProductGateway, criteria: ListCriteria) -> Result<()> {
    let products = gateway
        .list_all()
        .await
        .inspect_err(|e| println!("❌ Could not load products: {e}"))?;
    let mut view = CatalogView::new(products);
    view.set_criteria(criteria);
    print!("{}", pages::catalog(&view)?);
    Ok(())
}

async fn show_detail(gateway: &dyn ProductGateway, id: ProductId) -> Result<()> {
    let mut view = DetailView::new(id.clone(), ViewScope::new());
    view.load(gateway).await;
    let next = view.next_route();
    match view.into_state() {
        DetailState::Found(product) => print!("{}", pages::detail(&product)?),
        DetailState::Failed(e) => {
            println!("❌ Could not load product '{id}': {e}");
            return Err(e);
        }
        DetailState::NotFound | DetailState::Loading => {
            print!("{}", pages::product_not_found(&id));
            return redirect(next, gateway).await;
        }
    }
    Ok(())
}

/// Follows a redirect to the list page. Only the catalog is a redirect target.
async fn redirect(route: Option<Route>, gateway: &dyn ProductGateway) -> Result<()> {
    if route != Some(Route::Catalog) {
        return Ok(());
    }
    println!("\n→ {}\n", Route::Catalog);
    show_catalog(gateway, ListCriteria::default()).await
}

async fn show_edit_form(gateway: &dyn ProductGateway, id: ProductId) -> Result<()> {
    let mut flow = EditFlow::new(id.clone(), ViewScope::new());
    flow.load(gateway).await;
    let next = flow.next_route();
    match flow.into_state() {
        EditState::Ready { form, .. } => {
            print!("{}", pages::form(&format!("Edit product {id}"), &form, None)?);
            println!("\nChange fields with `inventario edit {id} --price ...`");
        }
        EditState::LoadFailed(e) => {
            println!("❌ Could not load product '{id}': {e}");
            return Err(e);
        }
        _ => {
            print!("{}", pages::product_not_found(&id));
            return redirect(next, gateway).await;
        }
    }
    Ok(())
}

#[instrument(skip(gateway, fields))]
async fn create(gateway: &dyn ProductGateway, fields: &ProductArgs) -> Result<()> {
    let mut flow = CreateFlow::new(ViewScope::new());
    if let Some(form) = flow.form_mut() {
        fields.apply_to(form);
    }
    flow.submit(gateway).await;

    let next = flow.next_route();
    let form = flow.form().clone();
    match flow.into_state() {
        CreateState::Created(id) => {
            println!("✅ Product '{}' created with id {id}.", form.name.trim());
            follow(next, gateway).await
        }
        CreateState::Editing {
            errors: Some(errors),
        } => {
            print!("{}", pages::form("New product", &form, Some(&errors))?);
            print!("{}", pages::validation_failed(&errors)?);
            Err(Error::Validation(errors))
        }
        CreateState::Failed(e) => {
            println!("❌ Could not create the product: {e}");
            Err(e)
        }
        CreateState::Editing { errors: None } | CreateState::Submitting => Ok(()),
    }
}

#[instrument(skip(gateway, fields))]
async fn edit(
    gateway: &dyn ProductGateway,
    id: ProductId,
    fields: &ProductArgs,
    yes: bool,
) -> Result<()> {
    let mut flow = EditFlow::new(id, ViewScope::new());
    flow.load(gateway).await;
    if flow.form().is_none() {
        return finish_edit(flow, gateway).await;
    }
    if let Some(form) = flow.form_mut() {
        fields.apply_to(form);
    }

    flow.request_save();
    if let EditState::Confirming { fields: pending, .. } = flow.state() {
        print!("{}", pages::edit_summary(flow.id(), pending));
        if !yes && !prompt::confirm("Save these changes?")? {
            flow.cancel_save();
            println!("Edit cancelled; nothing was saved.");
            return Ok(());
        }
        flow.confirm_save(gateway).await;
    }
    finish_edit(flow, gateway).await
}

/// Reports a finished edit flow and follows its navigation target.
async fn finish_edit(flow: EditFlow, gateway: &dyn ProductGateway) -> Result<()> {
    let next = flow.next_route();
    let id = flow.id().clone();
    match flow.into_state() {
        EditState::Updated => {
            println!("✅ Product '{id}' updated.");
            follow(next, gateway).await
        }
        EditState::NotFound => {
            print!("{}", pages::product_not_found(&id));
            follow(next, gateway).await
        }
        EditState::Ready {
            form,
            errors: Some(errors),
        } => {
            print!("{}", pages::form(&format!("Edit product {id}"), &form, Some(&errors))?);
            print!("{}", pages::validation_failed(&errors)?);
            Err(Error::Validation(errors))
        }
        EditState::LoadFailed(e) => {
            println!("❌ Could not load product '{id}': {e}");
            Err(e)
        }
        EditState::Failed { error, .. } => {
            println!("❌ Could not update the product: {error}");
            Err(error)
        }
        EditState::Loading
        | EditState::Ready { errors: None, .. }
        | EditState::Confirming { .. }
        | EditState::Submitting { .. } => Ok(()),
    }
}

#[instrument(skip(gateway))]
async fn delete(gateway: &dyn ProductGateway, id: ProductId, yes: bool) -> Result<()> {
    // The prompt names the product, so load it the way the detail page does
    let mut view = DetailView::new(id.clone(), ViewScope::new());
    view.load(gateway).await;
    let next = view.next_route();
    let product = match view.into_state() {
        DetailState::Found(product) => product,
        DetailState::Failed(e) => {
            println!("❌ Could not load product '{id}': {e}");
            return Err(e);
        }
        DetailState::NotFound | DetailState::Loading => {
            print!("{}", pages::product_not_found(&id));
            return redirect(next, gateway).await;
        }
    };

    let mut flow = DeleteFlow::new(ViewScope::new());
    flow.request(DeleteTarget::from(&product));
    let question = flow.prompt().unwrap_or_default();
    if !yes && !prompt::confirm(&question)? {
        flow.cancel();
        println!("Deletion cancelled.");
        return Ok(());
    }

    flow.confirm(gateway).await;
    if let Some(e) = flow.take_error() {
        println!("❌ Could not delete '{}': {e}", product.fields.name);
        return Err(e);
    }
    println!("✅ Product '{}' deleted.", product.fields.name);
    follow(flow.next_route(), gateway).await
}
