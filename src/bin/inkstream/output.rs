use colored::Colorize;
use comfy_table::{ContentArrangement, Table, presets::UTF8_FULL};

use inkstream::{Blog, Page};

pub fn success(message: &str) {
    println!("{} {message}", "✓".green());
}

pub fn note(message: &str) {
    println!("{}", message.dimmed());
}

pub fn print_blogs(blogs: &[Blog]) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["id", "title", "author", "likes", "saved", "created"]);
    for blog in blogs {
        table.add_row(vec![
            blog.id.clone(),
            blog.name.clone(),
            blog.author_name.clone(),
            blog.total_likes.to_string(),
            blog.total_saved.to_string(),
            blog.created_at.format("%Y-%m-%d %H:%M").to_string(),
        ]);
    }
    println!("{table}");
}

pub fn print_blog_page(page: &Page<Blog>) {
    print_blogs(&page.page);
    if page.is_done {
        note("end of results");
    } else {
        note(&format!("more available, continue with --cursor {}", page.continue_cursor));
    }
}
