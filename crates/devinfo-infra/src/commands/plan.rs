use crate::ui::{log_detail, print_header, print_info, print_success};
use anyhow::Result;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table, presets::UTF8_FULL};
use devinfo_infra::Stack;
use devinfo_infra::resources::ResourceSpec;

pub fn run_plan(stack: &Stack) -> Result<()> {
    print_header("Stack plan");

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("#").add_attribute(Attribute::Bold),
        Cell::new("Name").add_attribute(Attribute::Bold),
        Cell::new("Kind").add_attribute(Attribute::Bold),
        Cell::new("Type").add_attribute(Attribute::Bold),
        Cell::new("Depends on").add_attribute(Attribute::Bold),
    ]);

    for (i, resource) in stack.graph.topological_order()?.iter().enumerate() {
        let deps = resource.dependencies();
        table.add_row(vec![
            Cell::new((i + 1).to_string()),
            Cell::new(&resource.name).fg(Color::Cyan),
            Cell::new(resource.spec.kind()),
            Cell::new(resource.spec.type_token()),
            Cell::new(if deps.is_empty() {
                "-".to_string()
            } else {
                deps.join(", ")
            }),
        ]);
    }
    println!("{}", table);

    for resource in stack.graph.iter() {
        if let ResourceSpec::SecurityGroup(sg) = &resource.spec {
            print_info(&format!("{} rules:", resource.name));
            for rule in &sg.rules {
                let port = rule.port.map_or_else(|| "any".to_string(), |p| p.to_string());
                let detail = format!(
                    "{} {}/{} from {}",
                    rule.direction,
                    rule.protocol,
                    port,
                    rule.v4_cidr_blocks.join(",")
                );
                log_detail(&rule.description, &detail);
            }
        }
    }

    println!();
    print_success(&format!(
        "{} resources, {} outputs",
        stack.graph.len(),
        stack.outputs.len()
    ));
    Ok(())
}
