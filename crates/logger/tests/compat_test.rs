//! Tests for the `log` facade bridge

#[cfg(all(feature = "log-compat", feature = "test-support"))]
mod tests {
    use opsdash_logger::*;

    // The bridge installs a process-global `log` logger, so everything
    // that depends on it lives in one test.
    #[test]
    fn log_records_route_through_the_factory() {
        let (factory, out, err) = test_support::capture_factory();
        factory.set_level(Level::Verbose);
        factory.set_color(false);

        compat::log_bridge::init_log_bridge(factory.clone()).ok();

        log::error!("error from log crate");
        log::warn!("warning from log crate");
        log::info!("info from log crate");
        log::debug!("debug from log crate");
        log::trace!("trace from log crate");

        assert!(err.contains("error from log crate"));
        assert!(err.contains("warning from log crate"));
        assert!(out.contains("info from log crate"));
        assert!(out.contains("debug from log crate"));
        assert!(out.contains("trace from log crate"));
        assert!(out.contains("[VERB]"));

        // The record target doubles as the context label.
        assert!(out.contains(&format!("[{}]", module_path!())));

        // Silencing one bridged context leaves native emission alone.
        factory.set_bridge_filter(BridgeFilter::Contexts(
            [module_path!().to_string()].into_iter().collect(),
        ));
        out.clear();
        log::info!("silenced target");
        assert!(!out.contains("silenced target"));

        let native = Logger::with_factory(module_path!(), factory.clone());
        native.log("native still emits");
        assert!(out.contains("native still emits"));

        // `All` mutes every bridged record.
        factory.set_bridge_filter(BridgeFilter::All);
        log::info!("muted entirely");
        assert!(!out.contains("muted entirely"));
    }
}
