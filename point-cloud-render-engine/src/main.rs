mod engine;
mod rpc;
mod ui;

use crate::engine::core::app_setup::create_app;

fn main() {
    let mut app = match create_app() {
        Ok(app) => app,
        Err(e) => {
            eprintln!("Failed to start morph session: {e}");
            std::process::exit(1);
        }
    };

    #[cfg(target_arch = "wasm32")]
    {
        wasm_bindgen_futures::spawn_local(async move {
            app.run();
        });
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        app.run();
    }
}
