//! Receipt
//!
//! Renders one completed sale as a printable fixed-width text receipt in a
//! thermal-paper layout: centered store header, dashed separators, one row
//! per item, total and customer block.

use tabled::{Table, Tabled, settings::Style};

use crate::sales::Sale;

/// Receipt column width, sized for 80mm thermal paper.
const WIDTH: usize = 40;

/// Currency symbol printed before every amount.
const CURRENCY: &str = "$";

/// Store details printed in the receipt header and footer.
#[derive(Debug, Clone)]
pub struct StoreInfo {
    /// Store display name.
    pub name: String,

    /// Store tax identifier line.
    pub nit: String,

    /// Street address line.
    pub address: String,

    /// Phone line.
    pub phone: String,

    /// Closing line printed under the totals.
    pub footer: String,
}

impl Default for StoreInfo {
    fn default() -> Self {
        Self {
            name: "SimplePOS".to_string(),
            nit: "NIT: 900.123.456-7".to_string(),
            address: "Calle 123 # 45-67, Ciudad".to_string(),
            phone: "Tel: (601) 555-5555".to_string(),
            footer: "¡Gracias por su compra!".to_string(),
        }
    }
}

#[derive(Tabled)]
struct ItemRow {
    #[tabled(rename = "Cant")]
    quantity: String,

    #[tabled(rename = "Producto")]
    name: String,

    #[tabled(rename = "Total")]
    total: String,
}

/// Renders a sale with the default store details.
pub fn render(sale: &Sale) -> String {
    render_with(&StoreInfo::default(), sale)
}

/// Renders a sale with the given store details.
pub fn render_with(info: &StoreInfo, sale: &Sale) -> String {
    let mut out = String::new();

    push_centered(&mut out, &info.name);
    push_centered(&mut out, &info.nit);
    push_centered(&mut out, &info.address);
    push_centered(&mut out, &info.phone);
    push_separator(&mut out);

    push_line(&mut out, &format!("Venta:   {}", sale.id()));
    push_line(&mut out, &format!("Fecha:   {}", sale.date()));
    push_line(&mut out, &format!("Cliente: {}", sale.customer().name));
    push_line(&mut out, &format!("NIT:     {}", sale.customer().nit));
    push_separator(&mut out);

    let rows: Vec<ItemRow> = sale
        .items()
        .iter()
        .map(|line| ItemRow {
            quantity: format!("{} x {CURRENCY}{:.2}", line.quantity(), line.product().price),
            name: line.product().name.clone(),
            total: format!("{CURRENCY}{:.2}", line.total()),
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::empty());
    out.push_str(&table.to_string());
    out.push('\n');

    push_separator(&mut out);
    push_line(&mut out, &format!("TOTAL: {CURRENCY}{:.2}", sale.total()));
    push_separator(&mut out);
    push_centered(&mut out, &info.footer);

    out
}

fn push_line(out: &mut String, text: &str) {
    out.push_str(text);
    out.push('\n');
}

fn push_centered(out: &mut String, text: &str) {
    let pad = WIDTH.saturating_sub(text.chars().count()) / 2;
    push_line(out, &format!("{:pad$}{text}", ""));
}

fn push_separator(out: &mut String) {
    out.push_str(&"-".repeat(WIDTH));
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;

    use crate::{
        cart::CartLine,
        customers::Customer,
        products::{Product, ProductId},
        sales::SaleId,
    };

    use super::*;

    fn sale() -> Sale {
        let cafe = Product {
            id: ProductId::new("1"),
            name: "Café Premium Tostado".to_string(),
            price: "15.50".parse().unwrap(),
            stock: 50,
            category: "Bebidas".to_string(),
            image: String::new(),
        };
        let jugo = Product {
            id: ProductId::new("4"),
            name: "Jugo Natural de Naranja".to_string(),
            price: "5.00".parse().unwrap(),
            stock: 100,
            category: "Bebidas".to_string(),
            image: String::new(),
        };

        Sale::new(
            SaleId::new(),
            Timestamp::UNIX_EPOCH,
            vec![CartLine::new(cafe, 3), CartLine::new(jugo, 1)],
            "51.50".parse().unwrap(),
            Customer {
                name: "Ana".to_string(),
                email: "a@x.com".to_string(),
                nit: "1".to_string(),
            },
        )
    }

    #[test]
    fn receipt_contains_header_items_and_total() {
        let text = render(&sale());

        assert!(text.contains("SimplePOS"), "missing store header");
        assert!(
            text.contains("Café Premium Tostado"),
            "missing first item name"
        );
        assert!(
            text.contains("3 x $15.50"),
            "missing quantity and unit price"
        );
        assert!(text.contains("$46.50"), "missing first line total");
        assert!(text.contains("TOTAL: $51.50"), "missing sale total");
        assert!(text.contains("Cliente: Ana"), "missing customer name");
    }

    #[test]
    fn receipt_uses_custom_store_info() {
        let info = StoreInfo {
            name: "La Esquina".to_string(),
            ..StoreInfo::default()
        };

        let text = render_with(&info, &sale());

        assert!(text.contains("La Esquina"), "missing custom store name");
        assert!(!text.contains("SimplePOS"), "default name must not appear");
    }
}
