use crate::core::config::data::Config;

impl Config {
    pub fn print_all(&self) {
        println!("Current configuration:");
        print_entry("model", self.model.as_deref());
        print_entry("system-directive", self.system_directive.as_deref());
        print_entry("persona", self.persona.as_deref());
        match self.access_tier {
            Some(tier) => println!("  access-tier: {tier}"),
            None => println!("  access-tier: (unset, {})", self.access_tier()),
        }
        print_entry("base-url", self.base_url.as_deref());
        print_entry("listen", self.listen.as_deref());
        match self.request_timeout_secs {
            Some(secs) => println!("  request-timeout: {secs}s"),
            None => println!("  request-timeout: (unset)"),
        }
    }
}

fn print_entry(key: &str, value: Option<&str>) {
    match value {
        Some(value) => println!("  {key}: {value}"),
        None => println!("  {key}: (unset)"),
    }
}
