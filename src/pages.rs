//! Server-rendered HTML for every route.

use crate::{cart::LineItem, catalog::Product};

pub fn escape(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="UTF-8">
    <title>{title} - Malvern Store</title>
    <style>
        body {{ font-family: Helvetica, Arial, sans-serif; max-width: 720px; margin: 0 auto; padding: 20px; color: #333; }}
        nav a {{ margin-right: 12px; }}
        .product {{ border: 1px solid #e5e5e5; padding: 12px; margin: 8px 0; }}
        table {{ border-collapse: collapse; }}
        td, th {{ border: 1px solid #e5e5e5; padding: 6px 12px; text-align: left; }}
        form.inline {{ display: inline; }}
    </style>
</head>
<body>
    <nav>
        <a href="/">Home</a>
        <a href="/checkout">Checkout</a>
        <a href="/contact">Contact</a>
        <a href="/chat">Chat</a>
        <a href="/login">Login</a>
        <a href="/register">Register</a>
        <a href="/logout">Logout</a>
    </nav>
    {body}
</body>
</html>"#
    )
}

fn product_card(product: &Product) -> String {
    format!(
        r#"<div class="product">
        <strong>{name}</strong> - ${price:.2}
        <p>{description}</p>
        <form class="inline" method="post" action="/add_to_cart">
            <input type="hidden" name="product_id" value="{id}">
            <input type="number" name="quantity" value="1">
            <button type="submit">Add to cart</button>
        </form>
    </div>"#,
        name = escape(&product.name),
        price = product.price,
        description = escape(&product.description),
        id = product.id,
    )
}

pub fn home(products: &[Product], recommended: &[Product], user: Option<&str>) -> String {
    let greeting = match user {
        Some(name) => format!("<p>Hello, {}!</p>", escape(name)),
        None => String::new(),
    };
    let listing: String = products.iter().map(product_card).collect();
    let picks: String = recommended
        .iter()
        .map(|product| format!("<li>{}</li>", escape(&product.name)))
        .collect();

    layout(
        "Home",
        &format!(
            "{greeting}<h2>Products</h2>{listing}<h2>Recommended for you</h2><ul>{picks}</ul>"
        ),
    )
}

fn credentials_form(action: &str, submit: &str) -> String {
    format!(
        r#"<form method="post" action="{action}">
        <label>Username <input type="text" name="username"></label>
        <label>Password <input type="password" name="password"></label>
        <button type="submit">{submit}</button>
    </form>"#
    )
}

pub fn register_form() -> String {
    layout(
        "Register",
        &format!("<h2>Register</h2>{}", credentials_form("/register", "Register")),
    )
}

pub fn login_form() -> String {
    layout(
        "Login",
        &format!("<h2>Login</h2>{}", credentials_form("/login", "Login")),
    )
}

fn order_table(items: &[LineItem], total: f64) -> String {
    let rows: String = items
        .iter()
        .map(|item| {
            format!(
                "<tr><td>{}</td><td>{}</td><td>${:.2}</td></tr>",
                escape(&item.product.name),
                item.quantity,
                item.total,
            )
        })
        .collect();

    format!(
        "<table><tr><th>Item</th><th>Quantity</th><th>Total</th></tr>{rows}</table>\
         <p><strong>Total: ${total:.2}</strong></p>"
    )
}

pub fn checkout(items: &[LineItem], total: f64) -> String {
    layout(
        "Checkout",
        &format!(
            r#"<h2>Checkout</h2>{table}
            <form method="post" action="/place_order">
                <button type="submit">Place order</button>
            </form>"#,
            table = order_table(items, total),
        ),
    )
}

pub fn receipt(items: &[LineItem], total: f64) -> String {
    layout(
        "Receipt",
        &format!(
            "<h2>Thanks for your order!</h2>{}<p>A confirmation email is on its way.</p>",
            order_table(items, total),
        ),
    )
}

pub fn contact_form() -> String {
    layout(
        "Contact",
        r#"<h2>Contact us</h2>
        <form method="post" action="/contact">
            <label>Name <input type="text" name="name"></label>
            <label>Email <input type="text" name="email"></label>
            <label>Message <textarea name="message"></textarea></label>
            <button type="submit">Send</button>
        </form>"#,
    )
}

pub fn contact_thanks() -> String {
    layout(
        "Contact",
        "<h3>Thanks for reaching out! We'll get back to you soon.</h3><a href='/'>Back to store</a>",
    )
}

pub fn chat(reply: &str) -> String {
    let reply_block = if reply.is_empty() {
        String::new()
    } else {
        format!("<p><strong>Reply:</strong> {}</p>", escape(reply))
    };

    layout(
        "Chat",
        &format!(
            r#"<h2>Chat</h2>
            <form method="post" action="/chat">
                <label>Message <input type="text" name="message"></label>
                <button type="submit">Send</button>
            </form>
            {reply_block}"#
        ),
    )
}

pub fn admin_panel() -> String {
    layout(
        "Admin",
        "<h2>Welcome to the admin panel!</h2><a href='/'>Back to Store</a>",
    )
}

pub fn notice(text: &str) -> String {
    layout("Notice", &format!("<p>{}</p>", escape(text)))
}
