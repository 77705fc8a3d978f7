//! Document-level fullscreen adapter.

use platform_host::FullscreenService;

#[derive(Debug, Clone, Copy, Default)]
/// Browser fullscreen service driving `document.documentElement.requestFullscreen()`.
pub struct WebFullscreenService;

impl FullscreenService for WebFullscreenService {
    fn request_fullscreen(&self) -> Result<(), String> {
        #[cfg(target_arch = "wasm32")]
        {
            let element = web_sys::window()
                .and_then(|w| w.document())
                .and_then(|d| d.document_element())
                .ok_or_else(|| "document element unavailable".to_string())?;
            element.request_fullscreen().map_err(|e| {
                format!("requestFullscreen failed: {}", crate::js_error_message(&e))
            })
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            Err("native fullscreen unavailable".to_string())
        }
    }

    fn exit_fullscreen(&self) -> Result<(), String> {
        #[cfg(target_arch = "wasm32")]
        {
            let document = web_sys::window()
                .and_then(|w| w.document())
                .ok_or_else(|| "document unavailable".to_string())?;
            if document.fullscreen_element().is_some() {
                document.exit_fullscreen();
            }
            Ok(())
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            Ok(())
        }
    }

    fn is_fullscreen(&self) -> bool {
        #[cfg(target_arch = "wasm32")]
        {
            web_sys::window()
                .and_then(|w| w.document())
                .and_then(|d| d.fullscreen_element())
                .is_some()
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            false
        }
    }
}
