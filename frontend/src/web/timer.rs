//! 定时器封装模块

use leptos::logging;
use wasm_bindgen::prelude::*;

/// 周期性定时器
///
/// 封装 `setInterval`，drop 时自动清除。回调内不要 drop 自身。
pub struct Interval {
    handle: i32,
    #[allow(dead_code)]
    closure: Closure<dyn Fn()>,
}

impl Interval {
    /// 创建周期性定时器，无法获取 window 或注册失败时返回 `None`
    pub fn new<F>(millis: u32, callback: F) -> Option<Self>
    where
        F: Fn() + 'static,
    {
        let closure = Closure::<dyn Fn()>::new(callback);
        let window = web_sys::window()?;

        match window.set_interval_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            millis as i32,
        ) {
            Ok(handle) => Some(Self { handle, closure }),
            Err(e) => {
                logging::warn!("[Timer] setInterval failed: {:?}", e);
                None
            }
        }
    }

    pub fn cancel(&self) {
        if let Some(window) = web_sys::window() {
            window.clear_interval_with_handle(self.handle);
        }
    }
}

impl Drop for Interval {
    fn drop(&mut self) {
        self.cancel();
    }
}
