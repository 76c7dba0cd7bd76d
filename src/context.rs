use anyhow::Context;

use crate::{
    config::AppConfig,
    form::FormSession,
    storage::KeyValueStorage,
    store::RecordStore,
};

pub struct AppContext {
    pub config: AppConfig,
    pub session: FormSession<Box<dyn KeyValueStorage>>,
}

impl AppContext {
    pub fn open(config: AppConfig) -> anyhow::Result<Self> {
        let storage = config
            .storage
            .open()
            .with_context(|| format!("Opening storage {:?}", config.storage))?;
        let store = RecordStore::load(storage, config.id_policy)?;
        Ok(Self {
            config,
            session: FormSession::new(store),
        })
    }
}
