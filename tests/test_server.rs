//! Local HTTP server for browser tests
//!
//! Serves a copy of the storefront's login screen, an inventory page and a
//! page with a modal dialog, so the suite can run without network access.
//!
//! Each server instance runs on a random available port for test isolation.

#![allow(dead_code)]

use std::net::SocketAddr;
use tokio::sync::oneshot;
use warp::Filter;

const LOGIN_PAGE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
    <title>Swag Labs</title>
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <style>.error-message-container { min-height: 1em; }</style>
</head>
<body>
    <div class="login_container">
        <div class="login_logo">Swag Labs</div>
        <div class="login_wrapper">
            <form id="login-form">
                <input class="input_error form_input" placeholder="Username" type="text" data-test="username" id="user-name" name="user-name" autocomplete="off" value="">
                <input class="input_error form_input" placeholder="Password" type="password" data-test="password" id="password" name="password" autocomplete="off" value="">
                <div class="error-message-container"></div>
                <input type="submit" class="submit-button btn_action" data-test="login-button" id="login-button" name="login-button" value="Login">
            </form>
            <div class="login_credentials_wrap">
                <div class="login_credentials" id="login_credentials" data-test="login-credentials">
                    <h4>Accepted usernames are:</h4>standard_user<br>locked_out_user<br>problem_user<br>performance_glitch_user<br>error_user<br>visual_user<br>
                </div>
                <div class="login_password" data-test="login-password">
                    <h4>Password for all users:</h4>secret_sauce
                </div>
            </div>
        </div>
    </div>
    <script>
        const USERS = ["standard_user", "problem_user", "performance_glitch_user", "error_user", "visual_user", "locked_out_user"];
        document.getElementById("login-form").addEventListener("submit", (event) => {
            event.preventDefault();
            const user = document.getElementById("user-name").value;
            const password = document.getElementById("password").value;
            let error = null;
            if (!user) {
                error = "Epic sadface: Username is required";
            } else if (!password) {
                error = "Epic sadface: Password is required";
            } else if (!USERS.includes(user) || password !== "secret_sauce") {
                error = "Epic sadface: Username and password do not match any user in this service";
            } else if (user === "locked_out_user") {
                error = "Epic sadface: Sorry, this user has been locked out.";
            }
            if (error) {
                document.querySelector(".error-message-container").innerHTML =
                    '<h3 data-test="error">' + error + '</h3>';
                return;
            }
            window.location.href = "/inventory.html";
        });
    </script>
</body>
</html>"##;

const INVENTORY_PAGE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
    <title>Swag Labs</title>
</head>
<body>
    <div class="primary_header">
        <a class="shopping_cart_link" href="#">Cart</a>
    </div>
    <div class="inventory_list">
        <div class="inventory_item">
            <img class="inventory_item_img" alt="Backpack" width="100" height="100"
                 src="data:image/gif;base64,R0lGODlhAQABAAAAACw=">
            <div class="inventory_item_name">Sauce Labs Backpack</div>
        </div>
    </div>
</body>
</html>"##;

const DIALOG_PAGE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
    <title>Cart</title>
</head>
<body>
    <div class="cart">
        <h4>Your Cart</h4>
        <h4>Checkout: Your Information</h4>
        <h4>Remove item?</h4>
    </div>
    <dialog open>
        <h4>Remove item?</h4>
        <button> Cancel </button>
        <button>Remove</button>
    </dialog>
    <div style="height: 3000px"></div>
    <div class="footer">Footer</div>
</body>
</html>"##;

/// Test server that serves the storefront pages
pub struct TestServer {
    addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl TestServer {
    /// Start a new test server on a random available port
    pub async fn start() -> Self {
        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        // Routes
        let login = warp::path::end().map(|| warp::reply::html(LOGIN_PAGE));
        let inventory =
            warp::path("inventory.html").map(|| warp::reply::html(INVENTORY_PAGE));
        let dialog = warp::path("cart").map(|| warp::reply::html(DIALOG_PAGE));

        let routes = login.or(inventory).or(dialog);

        // Bind to random port
        let (addr, server) =
            warp::serve(routes).bind_with_graceful_shutdown(([127, 0, 0, 1], 0), async {
                shutdown_rx.await.ok();
            });

        // Spawn server in background
        tokio::spawn(server);

        Self {
            addr,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Base URL for this server, with a trailing slash (e.g. "http://127.0.0.1:12345/")
    pub fn url(&self) -> String {
        format!("http://{}/", self.addr)
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Wait for the server to be ready by making a test request
    pub async fn wait_ready(&self) -> anyhow::Result<()> {
        let url = self.url();
        let max_attempts = 10;

        for attempt in 1..=max_attempts {
            match reqwest::get(&url).await {
                Ok(response) if response.status().is_success() => {
                    println!("Test server ready on: {}", url);
                    return Ok(());
                }
                Ok(response) => {
                    println!(
                        "Attempt {}: Server returned status {}",
                        attempt,
                        response.status()
                    );
                }
                Err(e) => {
                    println!("Attempt {}: Server not ready - {}", attempt, e);
                }
            }

            if attempt < max_attempts {
                tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;
            }
        }

        anyhow::bail!(
            "Server did not become ready after {} attempts",
            max_attempts
        )
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        // Signal server to shutdown
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}
