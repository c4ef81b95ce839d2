use cy2pw::convert;

fn converted(source: &str) -> String {
    match convert(source) {
        Ok(output) => output,
        Err(error) => panic!("{}", error.report("scenario.cy.js", source)),
    }
}

#[test]
fn test_assertion_on_query() {
    let output = converted("cy.get('.a').should('have.class','x')");
    assert_eq!(output.matches("await expect(page.locator('.a')).toHaveClass(/x/);").count(), 1);
}

#[test]
fn test_action_is_not_an_assertion() {
    let output = converted("cy.get('.a').click()");
    assert_eq!(output, "await page.locator('.a').click();\n");
    assert!(!output.contains("expect"));
}

#[test]
fn test_key_directives_keep_order() {
    let output = converted("cy.get('.a').type('{selectall}{backspace}hi')");
    let select_all = output.find("process.platform === 'darwin' ? 'Meta+a' : 'Control+a'").unwrap();
    let backspace = output.find("press('Backspace')").unwrap();
    let fill = output.find("fill('hi')").unwrap();
    assert!(select_all < backspace && backspace < fill);
}

#[test]
fn test_viewport() {
    assert_eq!(
        converted("cy.viewport(320,480)"),
        "await page.setViewportSize({ width: 320, height: 480 });\n"
    );
}

#[test]
fn test_unknown_command_keeps_arguments() {
    let output = converted("cy.get('.a').nextUntil('#b')");
    assert!(output.contains("FIXME_nextUntil('#b')"));
    assert!(cy2pw::parser::parse(&output).is_ok());
}

#[test]
fn test_one_placeholder_per_unknown_step() {
    let output = converted("cy.get('.a').foo(1).bar('x', 2)");
    assert_eq!(output.matches("FIXME_").count(), 2);
    assert!(output.contains("FIXME_foo(1)"));
    assert!(output.contains("FIXME_bar('x', 2)"));
}

#[test]
fn test_negation_threads_through() {
    for (matcher, target) in [
        ("have.text', 'a'", "toHaveText"),
        ("be.visible'", "toBeVisible"),
        ("have.attr', 'href', '/'", "toHaveAttribute"),
    ] {
        let plain = converted(&format!("cy.get('.a').should('{matcher})"));
        let negated = converted(&format!("cy.get('.a').should('not.{matcher})"));
        assert_eq!(negated, plain.replace(&format!(".{target}("), &format!(".not.{target}(")));
        assert_ne!(negated, plain);
    }
}

#[test]
fn test_ligatures_become_one_assertion() {
    let output = converted("cy.get('.a').invoke('text').should('match', /x/)");
    assert_eq!(output, "await expect(page.locator('.a')).toHaveText(/x/);\n");

    let output = converted("cy.get('a').should('have.attr', 'href').and('include', 'x')");
    assert_eq!(output, "await expect(page.locator('a')).toHaveAttribute('href', /x/);\n");
}

#[test]
fn test_converted_output_is_stable() {
    let once = converted("cy.get('.a').click();\ncy.get('.a').should('be.visible');");
    assert_eq!(converted(&once), once);
}

#[test]
fn test_aliases() {
    let output = converted("cy.get('.a').as('item');\ncy.get('@item').click();");
    assert_eq!(output, "const item = page.locator('.a');\nawait item.click();\n");
}

#[test]
fn test_callbacks() {
    let output = converted("cy.get('.list').within(() => {\n  cy.get('li').should('have.length', 2);\n});");
    assert_eq!(
        output,
        "const scope = page.locator('.list');\nawait expect(scope.locator('li')).toHaveCount(2);\n"
    );

    let output = converted("cy.get('.a').then(($el) => {\n  expect($el).to.have.class('x');\n});");
    assert_eq!(output, "const $el = page.locator('.a');\nawait expect($el).toHaveClass(/x/);\n");
}

#[test]
fn test_test_file() {
    let source = "/// <reference types=\"cypress\" />\ndescribe('todo', () => {\n  beforeEach(() => {\n    cy.visit('/');\n  });\n\n  it('adds', () => {\n    cy.get('.new-todo').type('milk{enter}');\n    cy.get('.todo-list li').should('have.length', 1);\n  });\n});\n";
    let source = cy2pw::config::Config::default().prepare_source(source);
    let output = converted(&source);
    assert!(output.starts_with("import { test, expect } from '@playwright/test';\n\ntest.describe('todo', () => {"));
    assert!(output.contains("test.beforeEach(async ({ page }) => {\n    await page.goto('/');\n  });"));
    assert!(output.contains("test('adds', async ({ page }) => {"));
    assert!(output.contains("await page.locator('.new-todo').fill('milk');\n    await page.locator('.new-todo').press('Enter');"));
    assert!(output.contains("await expect(page.locator('.todo-list li')).toHaveCount(1);"));
    assert!(!output.contains("reference types"));
}

#[test]
fn test_parse_error_is_located() {
    let error = convert("describe('a', () => {\n  it('b', () => {\n    cy.get(;\n  });\n});").unwrap_err();
    assert_eq!(error.line, 3);
    assert!(error.column > 1);
}

#[test]
fn test_response_fields_are_methods() {
    let output = converted("cy.request('/c').then((response) => {\n  expect(response).property('status').to.equal(200);\n});");
    assert!(output.contains("expect(response.status()).toBe(200);"));
    assert!(!output.contains("toHaveProperty"));
}

#[test]
fn test_indexed_element_in_callback_is_awaited() {
    let output = converted("cy.get('.a').then(($a) => {\n  $a[1].focus();\n});");
    assert!(output.contains("await $a.nth(1).focus();"));
}

#[test]
fn test_environment_in_chain_arguments() {
    let output = converted("cy.visit(Cypress.env('URL'))");
    assert_eq!(output, "await page.goto(process.env['URL']);\n");
}

#[test]
fn test_attribute_value_survives_following_assertion() {
    let output = converted("cy.get('a').should('have.attr', 'href', '/y').and('include', 'y')");
    assert!(output.contains("toHaveAttribute('href', '/y')"));
    assert!(!output.contains("have.attr.include"));
}

#[test]
fn test_element_contains_text() {
    let output = converted("cy.get('li').then(($lis) => {\n  expect($lis.eq(0), 'first item').to.contain('Walk the dog');\n});");
    assert!(output.contains("await expect($lis.nth(0)).toHaveText('Walk the dog');"));
}

#[test]
fn test_network_requests_file() {
    let source = include_str!("fixtures/network_requests.cy.js");
    let source = cy2pw::config::Config::default().prepare_source(source);
    let output = converted(&source);
    assert!(output.contains("test.describe('Network Requests', () => {"));
    assert!(output.contains("const response = await page.request.get('https://jsonplaceholder.cypress.io/comments');"));
    assert_eq!(output.matches("expect(response.status()).toBe(200);").count(), 2);
    assert_eq!(output.matches("expect(await response.json()).toHaveProperty('length');").count(), 2);
    assert_eq!(output.matches("expect([500, 501]).toContain((await response.json()).length);").count(), 2);
    assert!(output.contains("expect(response).toHaveProperty('headers');"));
    assert!(!output.contains("response.status)"));
    assert!(!output.contains("response.body"));
}
