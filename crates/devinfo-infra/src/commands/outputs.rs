use crate::ui::print_header;
use anyhow::Result;
use comfy_table::{Attribute, Cell, ContentArrangement, Table, presets::UTF8_FULL};
use devinfo_infra::Stack;

pub fn run_outputs(stack: &Stack) -> Result<()> {
    print_header("Stack outputs");

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Output").add_attribute(Attribute::Bold),
        Cell::new("Expression").add_attribute(Attribute::Bold),
    ]);

    for output in &stack.outputs {
        table.add_row(vec![Cell::new(&output.name), Cell::new(output.value.render())]);
    }
    println!("{}", table);
    Ok(())
}
